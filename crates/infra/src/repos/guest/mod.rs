mod inmemory;
mod postgres;

use super::shared::repo::DeleteResult;
pub use inmemory::InMemoryGuestRepo;
pub use postgres::PostgresGuestRepo;
use rsvp_scheduler_domain::{Guest, PhoneNumber, ID};

#[async_trait::async_trait]
pub trait IGuestRepo: Send + Sync {
    async fn insert(&self, guest: &Guest) -> anyhow::Result<()>;
    async fn insert_many(&self, guests: &[Guest]) -> anyhow::Result<()>;
    /// Stores the `Guest` unconditionally and bumps its version
    async fn save(&self, guest: &Guest) -> anyhow::Result<()>;
    /// Stores the `Guest` only if the stored version still equals `guest.version`.
    /// Returns `false` when somebody else wrote the `Guest` in the meantime.
    async fn save_versioned(&self, guest: &Guest) -> anyhow::Result<bool>;
    async fn find(&self, guest_id: &ID) -> Option<Guest>;
    async fn find_by_event(&self, event_id: &ID) -> anyhow::Result<Vec<Guest>>;
    /// Guests with exactly this canonical phone, most recently updated first
    async fn find_by_phone(&self, phone: &PhoneNumber) -> anyhow::Result<Vec<Guest>>;
    /// Guests whose phone ends with the given digits, most recently updated first
    async fn find_by_phone_suffix(&self, suffix: &str) -> anyhow::Result<Vec<Guest>>;
    async fn delete(&self, guest_id: &ID) -> Option<Guest>;
    async fn delete_by_event(&self, event_id: &ID) -> anyhow::Result<DeleteResult>;
}

#[cfg(test)]
mod tests {
    use crate::RsvpContext;
    use rsvp_scheduler_domain::{ConversationState, Entity, Guest, PhoneNumber, ID};

    fn guest(event_id: &ID, phone: &str) -> Guest {
        Guest::new(
            event_id.clone(),
            "Dana".into(),
            PhoneNumber::parse(phone).unwrap(),
            10,
        )
    }

    #[tokio::test]
    async fn create_find_and_delete() {
        let ctx = RsvpContext::create_inmemory();
        let event_id = ID::default();
        let guests = vec![guest(&event_id, "0501234567"), guest(&event_id, "0527654321")];
        assert!(ctx.repos.guests.insert_many(&guests).await.is_ok());

        let by_event = ctx.repos.guests.find_by_event(&event_id).await.unwrap();
        assert_eq!(by_event.len(), 2);

        let deleted = ctx.repos.guests.delete(&guests[0].id).await.unwrap();
        assert!(deleted.eq(&guests[0]));

        let res = ctx.repos.guests.delete_by_event(&event_id).await.unwrap();
        assert_eq!(res.deleted_count, 1);
        assert!(ctx.repos.guests.find(&guests[1].id).await.is_none());
    }

    #[tokio::test]
    async fn find_by_phone_and_suffix() {
        let ctx = RsvpContext::create_inmemory();
        let stored = guest(&ID::default(), "+972 50-123-4567");
        ctx.repos.guests.insert(&stored).await.unwrap();

        let phone = PhoneNumber::parse("0501234567").unwrap();
        let found = ctx.repos.guests.find_by_phone(&phone).await.unwrap();
        assert_eq!(found.len(), 1);

        let found = ctx
            .repos
            .guests
            .find_by_phone_suffix("501234567")
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert!(ctx
            .repos
            .guests
            .find_by_phone_suffix("000000000")
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn versioned_save_detects_conflicts() {
        let ctx = RsvpContext::create_inmemory();
        let stored = guest(&ID::default(), "0501234567");
        ctx.repos.guests.insert(&stored).await.unwrap();

        let mut first = stored.clone();
        first.conversation_state = ConversationState::WaitingForRsvp;
        assert!(ctx.repos.guests.save_versioned(&first).await.unwrap());

        // Still holds the version that was read before the first write
        let mut second = stored.clone();
        second.conversation_state = ConversationState::Done;
        assert!(!ctx.repos.guests.save_versioned(&second).await.unwrap());

        let found = ctx.repos.guests.find(&stored.id).await.unwrap();
        assert_eq!(found.conversation_state, ConversationState::WaitingForRsvp);
        assert_eq!(found.version, stored.version + 1);
    }
}
