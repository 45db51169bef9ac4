use std::io::{self, Stdout, Write};

use serde::Serialize;

#[derive(Serialize)]
struct JsonRpcResponse<'a> {
	jsonrpc: &'a str,
	id: u64,
	#[serde(skip_serializing_if = "Option::is_none")]
	result: Option<serde_json::Value>,
	#[serde(skip_serializing_if = "Option::is_none")]
	error: Option<JsonRpcErrorBody>,
}

#[derive(Serialize)]
struct JsonRpcErrorBody {
	code: i32,
	message: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	data: Option<serde_json::Value>,
}

/// Writes one JSON-RPC message per line.
pub struct NdjsonTransport<W: Write = Stdout> {
	writer: W,
}

impl Default for NdjsonTransport<Stdout> {
	fn default() -> Self {
		Self::new()
	}
}

impl NdjsonTransport<Stdout> {
	pub fn new() -> Self {
		Self {
			writer: io::stdout(),
		}
	}
}

impl<W: Write> NdjsonTransport<W> {
	pub fn with_writer(writer: W) -> Self {
		Self { writer }
	}

	pub fn writer_mut(&mut self) -> &mut W {
		&mut self.writer
	}

	pub fn into_inner(self) -> W {
		self.writer
	}

	pub fn write_response(&mut self, id: u64, result: serde_json::Value) {
		self.write_line(&JsonRpcResponse {
			jsonrpc: "2.0",
			id,
			result: Some(result),
			error: None,
		});
	}

	pub fn write_error(
		&mut self,
		id: u64,
		code: i32,
		message: impl Into<String>,
		data: Option<serde_json::Value>,
	) {
		self.write_line(&JsonRpcResponse {
			jsonrpc: "2.0",
			id,
			result: None,
			error: Some(JsonRpcErrorBody {
				code,
				message: message.into(),
				data,
			}),
		});
	}

	fn write_line(&mut self, value: &impl Serialize) {
		if let Err(e) = serde_json::to_writer(&mut self.writer, value) {
			tracing::error!("Failed to serialize: {}", e);
			return;
		}
		if let Err(e) = writeln!(self.writer).and_then(|_| self.writer.flush()) {
			tracing::error!("Failed to write response: {}", e);
		}
	}
}
