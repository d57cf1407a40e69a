use std::future::Future;
use parking_lot::Mutex;
use crate::operation::model::BatchType;
use crate::transport::command::WriteCommand;
use crate::transport::response::WriteResponse;
use crate::transport::{ServerLimits, Transport, TransportError};

/// Produces the reply for the `call`-th dispatched command (0-based)
pub type Responder = Box<dyn Fn(&WriteCommand, usize) -> Result<WriteResponse, TransportError> + Send + Sync>;

/// In-memory transport with scripted replies, records every command it receives
pub struct MockTransport {
    pub limits: ServerLimits,
    responder: Responder,
    commands: Mutex<Vec<WriteCommand>>,
}

impl MockTransport {
    /// Acknowledges every statement of every command
    pub fn new() -> Self {
        MockTransport {
            limits: ServerLimits::default(),
            responder: Box::new(|command, _| Ok(MockTransport::acknowledge_all(command))),
            commands: Mutex::new(Vec::new()),
        }
    }

    pub fn with_limits(mut self, limits: ServerLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_responder<F>(mut self, responder: F) -> Self
    where
        F: Fn(&WriteCommand, usize) -> Result<WriteResponse, TransportError> + Send + Sync + 'static,
    {
        self.responder = Box::new(responder);
        self
    }

    /// Reply counting each statement as applied
    pub fn acknowledge_all(command: &WriteCommand) -> WriteResponse {
        let n = command.len() as u64;
        match command.batch_type {
            BatchType::Insert | BatchType::Delete => WriteResponse::acknowledged(n),
            BatchType::Update => WriteResponse::acknowledged(n).with_modified(n),
        }
    }

    pub fn dispatch_count(&self) -> usize {
        self.commands.lock().len()
    }

    pub fn commands(&self) -> Vec<WriteCommand> {
        self.commands.lock().clone()
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        MockTransport::new()
    }
}

impl Transport for MockTransport {
    fn server_limits(&self) -> ServerLimits {
        self.limits.clone()
    }

    fn dispatch(&self, command: WriteCommand) -> impl Future<Output = Result<WriteResponse, TransportError>> + Send {
        let call = {
            let mut commands = self.commands.lock();
            commands.push(command.clone());
            commands.len() - 1
        };
        let outcome = (self.responder)(&command, call);

        async move {
            // Replies never arrive synchronously
            tokio::task::yield_now().await;
            outcome
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::batch::Batch;
    use crate::core::types::{Document, Namespace};
    use crate::operation::model::{Operation, UpdateModification, UpdateStatement};

    fn update_command(count: usize) -> WriteCommand {
        let mut batch = Batch::new(BatchType::Update, 0);
        for i in 0..count {
            let statement = UpdateStatement::new(
                Document::new(),
                UpdateModification::Replacement(Document::new()),
                false,
            );
            batch.append(Operation::Update(statement), i, 10, 5);
        }
        WriteCommand::for_batch(&batch, &Namespace::new("db", "c"), true)
    }

    #[tokio::test]
    async fn records_commands_and_acknowledges() {
        let transport = MockTransport::new();
        let reply = transport.dispatch(update_command(3)).await.unwrap();

        assert_eq!(reply.n, 3);
        assert_eq!(reply.n_modified, Some(3));
        assert_eq!(transport.dispatch_count(), 1);
        assert_eq!(transport.commands()[0].len(), 3);
    }

    #[tokio::test]
    async fn scripted_failures_by_call_number() {
        let transport = MockTransport::new().with_responder(|command, call| {
            if call == 1 {
                Err(TransportError::timeout("socket timed out"))
            } else {
                Ok(MockTransport::acknowledge_all(command))
            }
        });

        assert!(transport.dispatch(update_command(1)).await.is_ok());
        let err = transport.dispatch(update_command(1)).await.unwrap_err();
        assert_eq!(err.code, crate::transport::NETWORK_TIMEOUT);
    }
}
