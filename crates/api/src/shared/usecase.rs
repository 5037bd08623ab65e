use futures::future::join_all;
use rsvp_scheduler_infra::RsvpContext;
use std::fmt::Debug;
use tracing::error;

/// Subscriber is a side effect to a `UseCase`
///
/// It is going to act upon the response of the execution
/// of the `UseCase` if the execution was a success.
#[async_trait::async_trait(?Send)]
pub trait Subscriber<U: UseCase> {
    async fn notify(&self, e: &U::Response, ctx: &RsvpContext);
}

#[async_trait::async_trait(?Send)]
pub trait UseCase: Debug {
    type Response: Debug;
    type Error: Debug;

    const NAME: &'static str;

    async fn execute(&mut self, ctx: &RsvpContext) -> Result<Self::Response, Self::Error>;

    fn subscribers() -> Vec<Box<dyn Subscriber<Self>>> {
        Default::default()
    }
}

#[tracing::instrument(name = "Executing usecase", skip(usecase, ctx), fields(usecase = %U::NAME))]
pub async fn execute<U>(mut usecase: U, ctx: &RsvpContext) -> Result<U::Response, U::Error>
where
    U: UseCase,
{
    let res = usecase.execute(ctx).await;

    match &res {
        Ok(res) => {
            let subscribers = U::subscribers();
            let mut subscriber_promises = Vec::with_capacity(subscribers.len());
            for subscriber in &subscribers {
                subscriber_promises.push(subscriber.notify(res, ctx));
            }
            join_all(subscriber_promises).await;
        }
        Err(e) => {
            error!("Use case error: {:?}", e);
        }
    }

    res
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::shared::test_helpers::{date, insert_event, insert_guest, setup_at};
    use rsvp_scheduler_domain::{Guest, PackageKind, ID};
    use rsvp_scheduler_infra::delivery::SentMessageKind;

    #[derive(Debug)]
    struct GreetGuestUseCase {
        guest_id: ID,
    }

    #[async_trait::async_trait(?Send)]
    impl UseCase for GreetGuestUseCase {
        type Response = Guest;

        type Error = ();

        const NAME: &'static str = "GreetGuest";

        async fn execute(&mut self, ctx: &RsvpContext) -> Result<Self::Response, Self::Error> {
            ctx.repos.guests.find(&self.guest_id).await.ok_or(())
        }

        fn subscribers() -> Vec<Box<dyn Subscriber<Self>>> {
            vec![Box::new(SayHello), Box::new(SayHello)]
        }
    }

    struct SayHello;

    #[async_trait::async_trait(?Send)]
    impl Subscriber<GreetGuestUseCase> for SayHello {
        async fn notify(&self, guest: &Guest, ctx: &RsvpContext) {
            let _ = ctx
                .providers
                .whatsapp
                .send_free_text(&guest.phone, "Hello")
                .await;
        }
    }

    #[actix_web::main]
    #[test]
    async fn notifies_every_subscriber_on_success() {
        let test = setup_at(date(2025, 11, 1));
        let event = insert_event(&test.ctx, None, PackageKind::Full).await;
        let guest = insert_guest(&test.ctx, &event, "Dana", "0501234567").await;

        let res = execute(GreetGuestUseCase { guest_id: guest.id }, &test.ctx).await;
        assert!(res.is_ok());
        let sent = test.whatsapp.sent();
        assert_eq!(sent.len(), 2);
        assert!(sent
            .iter()
            .all(|m| m.kind == SentMessageKind::FreeText("Hello".into())));
    }

    #[actix_web::main]
    #[test]
    async fn failed_use_case_has_no_side_effects() {
        let test = setup_at(date(2025, 11, 1));

        let res = execute(
            GreetGuestUseCase {
                guest_id: ID::default(),
            },
            &test.ctx,
        )
        .await;
        assert!(res.is_err());
        assert!(test.whatsapp.sent().is_empty());
    }
}
