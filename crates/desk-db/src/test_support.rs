//! Shared test utilities for desk-db unit tests.

pub(crate) mod helpers {
    use desk_core::entities::{NewTicket, Ticket};
    use tempfile::TempDir;

    use crate::DeskDb;
    use crate::context::OpContext;
    use crate::service::TicketStore;

    /// A migrated database in a fresh temp dir. Keep the `TempDir` alive for
    /// as long as the database is used.
    ///
    /// `:memory:` is private to one connection, so pooled tests need a file.
    pub async fn test_db() -> (TempDir, DeskDb) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tickets.db");
        let db = DeskDb::open_local(&path.to_string_lossy()).await.unwrap();
        (dir, db)
    }

    pub async fn test_store() -> (TempDir, TicketStore) {
        let (dir, db) = test_db().await;
        (dir, TicketStore::new(db))
    }

    /// A context generous enough never to expire in a test.
    pub fn ctx() -> OpContext {
        OpContext::with_timeout(std::time::Duration::from_secs(10))
    }

    /// Create a ticket with only a title.
    pub async fn create_titled(store: &TicketStore, title: &str) -> Ticket {
        store
            .create_ticket(&ctx(), NewTicket::titled(title))
            .await
            .unwrap()
    }
}
