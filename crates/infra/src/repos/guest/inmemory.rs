use super::IGuestRepo;
use crate::repos::shared::inmemory_repo::*;
use crate::repos::shared::repo::DeleteResult;
use rsvp_scheduler_domain::{Guest, PhoneNumber, ID};

pub struct InMemoryGuestRepo {
    guests: std::sync::Mutex<Vec<Guest>>,
}

impl InMemoryGuestRepo {
    pub fn new() -> Self {
        Self {
            guests: std::sync::Mutex::new(Vec::new()),
        }
    }
}

fn most_recent_first(mut guests: Vec<Guest>) -> Vec<Guest> {
    guests.sort_by(|a, b| b.updated.cmp(&a.updated));
    guests
}

#[async_trait::async_trait]
impl IGuestRepo for InMemoryGuestRepo {
    async fn insert(&self, guest: &Guest) -> anyhow::Result<()> {
        insert(guest, &self.guests);
        Ok(())
    }

    async fn insert_many(&self, guests: &[Guest]) -> anyhow::Result<()> {
        for guest in guests {
            insert(guest, &self.guests);
        }
        Ok(())
    }

    async fn save(&self, guest: &Guest) -> anyhow::Result<()> {
        let mut guest = guest.clone();
        guest.version += 1;
        save(&guest, &self.guests);
        Ok(())
    }

    async fn save_versioned(&self, guest: &Guest) -> anyhow::Result<bool> {
        let saved = update_if(
            &guest.id,
            &self.guests,
            |stored| stored.version == guest.version,
            |stored| {
                *stored = guest.clone();
                stored.version += 1;
            },
        );
        Ok(saved)
    }

    async fn find(&self, guest_id: &ID) -> Option<Guest> {
        find(guest_id, &self.guests)
    }

    async fn find_by_event(&self, event_id: &ID) -> anyhow::Result<Vec<Guest>> {
        Ok(find_by(&self.guests, |g| g.event_id == *event_id))
    }

    async fn find_by_phone(&self, phone: &PhoneNumber) -> anyhow::Result<Vec<Guest>> {
        Ok(most_recent_first(find_by(&self.guests, |g| g.phone == *phone)))
    }

    async fn find_by_phone_suffix(&self, suffix: &str) -> anyhow::Result<Vec<Guest>> {
        Ok(most_recent_first(find_by(&self.guests, |g| {
            g.phone.as_str().ends_with(suffix)
        })))
    }

    async fn delete(&self, guest_id: &ID) -> Option<Guest> {
        delete(guest_id, &self.guests)
    }

    async fn delete_by_event(&self, event_id: &ID) -> anyhow::Result<DeleteResult> {
        Ok(delete_by(&self.guests, |g| g.event_id == *event_id))
    }
}
