use std::{future::Future, pin::Pin, sync::Arc};

use crate::events::{
    BookingConfirmedEvent,
    BookingFailedEvent,
    EventHandler,
    EventProducer,
    Handler,
    SideEffectFailedEvent,
};

#[derive(Default, Clone)]
pub struct EventProducers {
    pub booking_confirmed_producer: Vec<EventProducer<BookingConfirmedEvent>>,
    pub booking_failed_producer: Vec<EventProducer<BookingFailedEvent>>,
    pub side_effect_failed_producer: Vec<EventProducer<SideEffectFailedEvent>>,
}

impl EventProducers {
    pub async fn publish_booking_confirmed(&self, event: BookingConfirmedEvent) {
        for emitter in &self.booking_confirmed_producer {
            emitter.publish_event(event.clone()).await;
        }
    }

    pub async fn publish_booking_failed(&self, event: BookingFailedEvent) {
        for emitter in &self.booking_failed_producer {
            emitter.publish_event(event.clone()).await;
        }
    }

    pub async fn publish_side_effect_failed(&self, event: SideEffectFailedEvent) {
        for emitter in &self.side_effect_failed_producer {
            emitter.publish_event(event.clone()).await;
        }
    }
}

pub struct EventHandlers {
    pub on_booking_confirmed: Option<EventHandler<BookingConfirmedEvent>>,
    pub on_booking_failed: Option<EventHandler<BookingFailedEvent>>,
    pub on_side_effect_failed: Option<EventHandler<SideEffectFailedEvent>>,
}

impl EventHandlers {
    pub fn new(buffer_size: usize, hooks: EventHooks) -> Self {
        let on_booking_confirmed = hooks.on_booking_confirmed.map(|f| EventHandler::new(buffer_size, f));
        let on_booking_failed = hooks.on_booking_failed.map(|f| EventHandler::new(buffer_size, f));
        let on_side_effect_failed = hooks.on_side_effect_failed.map(|f| EventHandler::new(buffer_size, f));
        Self { on_booking_confirmed, on_booking_failed, on_side_effect_failed }
    }

    pub fn producers(&self) -> EventProducers {
        let mut result = EventProducers::default();
        if let Some(handler) = &self.on_booking_confirmed {
            result.booking_confirmed_producer.push(handler.subscribe());
        }
        if let Some(handler) = &self.on_booking_failed {
            result.booking_failed_producer.push(handler.subscribe());
        }
        if let Some(handler) = &self.on_side_effect_failed {
            result.side_effect_failed_producer.push(handler.subscribe());
        }
        result
    }

    pub async fn start_handlers(self) {
        if let Some(handler) = self.on_booking_confirmed {
            tokio::spawn(async move {
                handler.start_handler().await;
            });
        }
        if let Some(handler) = self.on_booking_failed {
            tokio::spawn(async move {
                handler.start_handler().await;
            });
        }
        if let Some(handler) = self.on_side_effect_failed {
            tokio::spawn(async move {
                handler.start_handler().await;
            });
        }
    }
}

type BoxedHookFuture = Pin<Box<dyn Future<Output = ()> + Send>>;

#[derive(Default, Clone)]
pub struct EventHooks {
    pub on_booking_confirmed: Option<Handler<BookingConfirmedEvent>>,
    pub on_booking_failed: Option<Handler<BookingFailedEvent>>,
    pub on_side_effect_failed: Option<Handler<SideEffectFailedEvent>>,
}

impl EventHooks {
    pub fn on_booking_confirmed<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(BookingConfirmedEvent) -> BoxedHookFuture) + Send + Sync + 'static {
        self.on_booking_confirmed = Some(Arc::new(f));
        self
    }

    pub fn on_booking_failed<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(BookingFailedEvent) -> BoxedHookFuture) + Send + Sync + 'static {
        self.on_booking_failed = Some(Arc::new(f));
        self
    }

    pub fn on_side_effect_failed<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(SideEffectFailedEvent) -> BoxedHookFuture) + Send + Sync + 'static {
        self.on_side_effect_failed = Some(Arc::new(f));
        self
    }
}
