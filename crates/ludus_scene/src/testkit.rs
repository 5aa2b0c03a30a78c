//! Test doubles for the scene core: a mock component whose lifecycle is
//! observable through a shared event log, and a factory pre-loaded with
//! it. Lets entity and scene tests run without any real component set.

use std::any::Any;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;

use crate::component::{Component, SetupContext};
use crate::entity::EntityRef;
use crate::factory::ComponentFactory;

/// One observed lifecycle event.
#[derive(Debug)]
pub(crate) enum Event {
    /// A mock component was constructed by the factory.
    Created { tag: String, owner: EntityRef },
    /// A mock component's `setup` ran.
    Setup { tag: String, config: Value },
}

/// Shared log the mock component reports into.
pub(crate) type EventLog = Arc<Mutex<Vec<Event>>>;

pub(crate) fn new_log() -> EventLog {
    Arc::new(Mutex::new(Vec::new()))
}

/// A component that records its creation and setup instead of doing
/// anything.
pub(crate) struct MockComponent {
    pub tag: String,
    pub owner: EntityRef,
    log: EventLog,
}

#[async_trait]
impl Component for MockComponent {
    fn tag(&self) -> &str {
        &self.tag
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    async fn setup(&mut self, _ctx: &SetupContext<'_>, config: &Value) -> anyhow::Result<()> {
        self.log.lock().push(Event::Setup {
            tag: self.tag.clone(),
            config: config.clone(),
        });
        Ok(())
    }
}

/// Build a factory with the mock component registered under each of
/// `tags`, all reporting into `log`.
pub(crate) fn mock_factory(tags: &[&str], log: &EventLog) -> ComponentFactory {
    let mut factory = ComponentFactory::new();
    for tag in tags {
        let log = log.clone();
        factory.register(*tag, move |tag, owner| {
            log.lock().push(Event::Created {
                tag: tag.to_string(),
                owner: owner.clone(),
            });
            Box::new(MockComponent {
                tag: tag.to_string(),
                owner,
                log: log.clone(),
            })
        });
    }
    factory
}
