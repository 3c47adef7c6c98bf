use crate::ports::UpstreamExchange;
use dns_forwarder_domain::{DomainError, Message, Question, ResponseCode};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Splits a client query into single-question upstream queries and merges
/// the answers back into one response.
pub struct ForwardingEngine {
    upstream: Arc<dyn UpstreamExchange>,
    query_timeout: Duration,
}

impl ForwardingEngine {
    pub fn new(upstream: Arc<dyn UpstreamExchange>, query_timeout: Duration) -> Self {
        Self {
            upstream,
            query_timeout,
        }
    }

    /// Produces the response for `query`.
    ///
    /// Non-QUERY opcodes are answered with NOTIMP without contacting the
    /// upstream. Questions are forwarded one at a time in order; the first
    /// failing exchange aborts the whole query with
    /// [`DomainError::UpstreamFailure`] and no partial answer is returned.
    pub async fn handle(&self, query: &Message) -> Result<Message, DomainError> {
        if !query.header.opcode.is_query() {
            debug!(
                id = query.header.id,
                opcode = %query.header.opcode,
                "Unsupported opcode, answering NOTIMP"
            );
            return Ok(Message::error_response(query, ResponseCode::NotImp));
        }

        let start = Instant::now();
        let mut answers = Vec::new();

        for (index, question) in query.questions.iter().enumerate() {
            let reply = self
                .forward_question(query, question)
                .await
                .map_err(|e| {
                    warn!(
                        id = query.header.id,
                        question = %question,
                        server = %self.upstream.server(),
                        error = %e,
                        "Upstream exchange failed"
                    );
                    DomainError::upstream(index, e)
                })?;
            answers.extend(reply.answers);
        }

        let mut response = Message::response_to(query);
        response.header.ra = true;
        response.header.rcode = ResponseCode::NoError;
        response.answers = answers;

        debug!(
            id = query.header.id,
            questions = response.qdcount(),
            answers = response.ancount(),
            elapsed_us = start.elapsed().as_micros() as u64,
            "Query forwarded"
        );

        Ok(response)
    }

    async fn forward_question(
        &self,
        query: &Message,
        question: &Question,
    ) -> Result<Message, DomainError> {
        let mut subquery = Message::new(query.header);
        subquery.header.qr = false;
        subquery.header.aa = false;
        subquery.header.tc = false;
        subquery.header.ra = false;
        subquery.header.rcode = ResponseCode::NoError;
        subquery.questions.push(question.clone());

        let bytes = subquery.to_bytes()?;
        let reply_bytes = self.upstream.exchange(&bytes, self.query_timeout).await?;
        let reply = Message::decode(&reply_bytes)?;

        if reply.header.id != subquery.header.id {
            return Err(DomainError::malformed(format!(
                "upstream reply id {} does not match query id {}",
                reply.header.id, subquery.header.id
            )));
        }

        Ok(reply)
    }
}
