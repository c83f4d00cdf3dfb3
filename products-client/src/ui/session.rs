//! Terminal session: owns the cache, the dispatcher and the event loop.
//!
//! Input arrives from a reader thread over a channel, cache snapshots over a
//! watch channel; both are multiplexed with a periodic tick so the header
//! clock and "refreshing" marker stay current. Deletes and reloads run as
//! in-flight futures polled by the same loop, so the screen never waits on
//! the backend.

use std::sync::Arc;

use futures::{
    future::{FutureExt, LocalBoxFuture},
    stream::{FuturesUnordered, StreamExt},
};
use ratatui::DefaultTerminal;
use tokio::{
    sync::{mpsc, watch},
    time::{self, Duration},
};

use crate::api::{HttpProductApi, ProductApi};
use crate::cmd::{DeleteOutcome, RowActions};
use crate::config::ClientConfig;
use crate::error::MutationError;
use crate::store::{ResourceCache, ResourceSnapshot, PRODUCTS_KEY};
use crate::structs::ProductId;
use crate::table::TableState;
use crate::ui::{
    app::{App, Effect, PromptAnswer, SharedRoute, StatusLevel},
    events::{map_key, spawn_input_reader},
    views::draw_product_list,
};

type Actions<A> = RowActions<A, PromptAnswer, SharedRoute>;

/// Runs the list screen until the user quits.
pub async fn run(config: ClientConfig) -> Result<(), Box<dyn std::error::Error>> {
    let api = Arc::new(HttpProductApi::new(&config)?);
    let cache = ResourceCache::new(api);
    let page_size = config.initial_page_size()?;

    let updates = cache.subscribe(PRODUCTS_KEY).await;
    tokio::spawn({
        let cache = cache.clone();
        async move {
            // the outcome reaches the screen through the snapshot channel
            let _ = cache.load(PRODUCTS_KEY).await;
        }
    });

    let route = SharedRoute::default();
    let answer = PromptAnswer::default();
    let actions = RowActions::new(cache.clone(), answer.clone(), route.clone());
    let mut app = App::new(TableState::with_page_size(page_size), route, answer);

    let mut terminal = ratatui::init();
    let result = event_loop(&mut terminal, &mut app, &actions, updates).await;
    ratatui::restore();

    cache.shutdown().await;
    result
}

async fn event_loop<A: ProductApi>(
    terminal: &mut DefaultTerminal,
    app: &mut App,
    actions: &Actions<A>,
    mut updates: watch::Receiver<ResourceSnapshot>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut keys: mpsc::UnboundedReceiver<_> = spawn_input_reader();
    let mut tick = time::interval(Duration::from_millis(1_000));
    let mut in_flight = InFlight::new();

    app.apply_snapshot(updates.borrow_and_update().clone());

    while !app.should_quit {
        terminal.draw(|f| draw_product_list(f, app))?;

        tokio::select! {
            // polled first so a queued delete reads its prompt answer
            // before the next key can replace it
            biased;

            Some(settled) = in_flight.next(), if !in_flight.is_empty() => {
                apply_settled(app, settled);
            }

            key = keys.recv() => {
                let Some(key) = key else {
                    tracing::warn!("input reader stopped");
                    break;
                };
                if let Some(effect) = map_key(key, app.mode).and_then(|action| app.handle(action)) {
                    start_effect(effect, app, actions, &mut in_flight);
                }
            }

            Ok(()) = updates.changed() => {
                app.apply_snapshot(updates.borrow_and_update().clone());
            }

            _ = tick.tick() => {}
        }
    }

    if !in_flight.is_empty() {
        tracing::info!(pending = in_flight.len(), "dropping unfinished requests on quit");
    }
    Ok(())
}

/// Outcome of backend work started from the screen.
enum Settled {
    Deleted(ProductId, Result<DeleteOutcome, MutationError>),
    Reloaded,
}

type InFlight<'a> = FuturesUnordered<LocalBoxFuture<'a, Settled>>;

/// Navigation happens right away. Backend calls are queued on `in_flight`
/// so the loop keeps drawing and reading keys while they run.
fn start_effect<'a, A: ProductApi>(
    effect: Effect,
    app: &mut App,
    actions: &'a Actions<A>,
    in_flight: &mut InFlight<'a>,
) {
    match effect {
        Effect::Delete(id) => {
            app.set_status(StatusLevel::Info, format!("Deleting product {id}..."));
            in_flight.push(
                async move {
                    let outcome = actions.request_delete(&id).await;
                    Settled::Deleted(id, outcome)
                }
                .boxed_local(),
            );
        }
        Effect::Reload => {
            app.status = None;
            in_flight.push(
                async move {
                    actions.reload().await;
                    Settled::Reloaded
                }
                .boxed_local(),
            );
        }
        Effect::Edit(id) => actions.request_edit(&id),
        Effect::Add => actions.request_add(),
        Effect::Back => actions.back_to_list(),
    }
}

/// Backend errors end up on the status line; the loop keeps running.
fn apply_settled(app: &mut App, settled: Settled) {
    match settled {
        Settled::Deleted(id, Ok(DeleteOutcome::Deleted)) => {
            app.set_status(StatusLevel::Info, format!("Deleted product {id}"))
        }
        Settled::Deleted(_, Ok(DeleteOutcome::Declined)) => app.status = None,
        Settled::Deleted(_, Err(err)) => {
            tracing::error!(error = %err, "delete failed");
            app.set_status(StatusLevel::Error, err.user_message());
        }
        Settled::Reloaded => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmd::testing::product;
    use crate::error::ApiError;
    use crate::structs::{Product, ProductInput};
    use crate::ui::events::Action;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Notify;

    /// Backend whose deletes hang until released.
    #[derive(Default)]
    struct SlowDeleteApi {
        release: Notify,
        deletes: AtomicUsize,
        fail: bool,
    }

    impl ProductApi for SlowDeleteApi {
        async fn list(&self) -> Result<Vec<Product>, ApiError> {
            Ok(vec![product(1, "Pen"), product(2, "Book")])
        }

        async fn delete(&self, _id: &ProductId) -> Result<(), ApiError> {
            self.deletes.fetch_add(1, Ordering::SeqCst);
            self.release.notified().await;
            if self.fail {
                return Err(ApiError::Status { status: 500, message: "boom".into() });
            }
            Ok(())
        }

        async fn create(&self, _input: &ProductInput) -> Result<(), ApiError> {
            Ok(())
        }

        async fn update(&self, _id: &ProductId, _input: &ProductInput) -> Result<(), ApiError> {
            Ok(())
        }
    }

    async fn setup(api: SlowDeleteApi) -> (Arc<SlowDeleteApi>, Actions<SlowDeleteApi>, App) {
        let api = Arc::new(api);
        let cache = ResourceCache::new(Arc::clone(&api));
        let rows = cache.load(PRODUCTS_KEY).await.unwrap();

        let route = SharedRoute::default();
        let answer = PromptAnswer::default();
        let actions = RowActions::new(cache, answer.clone(), route.clone());
        let mut app = App::new(TableState::default(), route, answer);
        app.apply_snapshot(ResourceSnapshot {
            data: Some(rows),
            ..ResourceSnapshot::default()
        });
        (api, actions, app)
    }

    #[tokio::test]
    async fn test_screen_stays_live_while_delete_is_in_flight() {
        let (api, actions, mut app) = setup(SlowDeleteApi::default()).await;
        let mut in_flight = InFlight::new();

        app.handle(Action::Delete);
        let effect = app.handle(Action::Answer(true)).unwrap();
        start_effect(effect, &mut app, &actions, &mut in_flight);
        assert_eq!(in_flight.len(), 1);
        assert!(futures::poll!(in_flight.next()).is_pending());
        assert_eq!(api.deletes.load(Ordering::SeqCst), 1);

        // keys are still handled while the request hangs
        app.handle(Action::SelectNext);
        assert_eq!(app.selected, 1);
        assert_eq!(app.status.as_ref().unwrap().text, "Deleting product 1...");

        api.release.notify_one();
        let settled = in_flight.next().await.unwrap();
        apply_settled(&mut app, settled);
        assert_eq!(app.status.as_ref().unwrap().text, "Deleted product 1");
        assert!(in_flight.is_empty());
    }

    #[tokio::test]
    async fn test_failed_delete_lands_on_status_line() {
        let (api, actions, mut app) = setup(SlowDeleteApi {
            fail: true,
            ..SlowDeleteApi::default()
        })
        .await;
        let mut in_flight = InFlight::new();

        app.handle(Action::Delete);
        let effect = app.handle(Action::Answer(true)).unwrap();
        start_effect(effect, &mut app, &actions, &mut in_flight);
        api.release.notify_one();

        let settled = in_flight.next().await.unwrap();
        apply_settled(&mut app, settled);
        let status = app.status.as_ref().unwrap();
        assert_eq!(status.level, StatusLevel::Error);
        assert_eq!(app.view().rows.len(), 2);
    }

    #[tokio::test]
    async fn test_navigation_effects_apply_immediately() {
        let (_api, actions, mut app) = setup(SlowDeleteApi::default()).await;
        let mut in_flight = InFlight::new();

        start_effect(Effect::Add, &mut app, &actions, &mut in_flight);
        assert!(in_flight.is_empty());
        assert_eq!(app.route.current(), crate::cmd::Route::Add);
    }
}
