use dns_forwarder_domain::wire::HEADER_LEN;
use dns_forwarder_domain::{Header, ResponseCode};

/// Builds a header-only SERVFAIL straight from the raw client datagram,
/// for queries that could not be decoded.
///
/// The id is echoed, and so are the opcode and RD bit when the flags word is
/// present. All section counts are zero. Returns `None` when not even the
/// 2-byte id survived, in which case the datagram is dropped.
pub fn build_servfail(raw: &[u8]) -> Option<Vec<u8>> {
    let id = u16::from_be_bytes([*raw.first()?, *raw.get(1)?]);

    let mut header = Header {
        id,
        qr: true,
        rcode: ResponseCode::ServFail,
        ..Header::default()
    };
    if let Some(&[hi, lo]) = raw.get(2..4) {
        let request = Header::from_flags(id, u16::from_be_bytes([hi, lo]));
        header.opcode = request.opcode;
        header.rd = request.rd;
    }

    let mut buf = Vec::with_capacity(HEADER_LEN);
    buf.extend_from_slice(&header.id.to_be_bytes());
    buf.extend_from_slice(&header.flags().to_be_bytes());
    buf.resize(HEADER_LEN, 0);
    Some(buf)
}
