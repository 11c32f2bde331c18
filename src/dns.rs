use std::net::SocketAddr;

use hickory_proto::op::{Message, MessageType, Query, ResponseCode};
use hickory_proto::rr::{Name, RecordType};
use hickory_proto::ProtoError;

use crate::error::ResolveError;

/// Build an A query with recursion desired for the given domain.
///
/// Returns the serialized query bytes ready to send over UDP.
pub fn build_query(domain: &str, txid: u16) -> Result<Vec<u8>, ProtoError> {
	let name = Name::from_ascii(domain)?;

	let mut message = Message::new();
	message.set_id(txid);
	message.set_recursion_desired(true);
	message.add_query(Query::query(name, RecordType::A));

	message.to_vec()
}

/// Check that a datagram is the response to our query.
///
/// Only the header is validated: the bytes must parse, be a response and
/// carry the expected transaction ID. The response code is returned for
/// logging but is not judged.
pub fn parse_response(
	bytes: &[u8],
	expected_txid: u16,
	server: SocketAddr,
) -> Result<ResponseCode, ResolveError> {
	let message = Message::from_vec(bytes)
		.map_err(|e| ResolveError::Malformed { server, reason: e.to_string() })?;

	if message.id() != expected_txid {
		return Err(ResolveError::IdMismatch {
			server,
			expected: expected_txid,
			got: message.id(),
		});
	}

	if message.message_type() != MessageType::Response {
		return Err(ResolveError::NotResponse { server });
	}

	Ok(message.response_code())
}
