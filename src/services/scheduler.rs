use async_trait::async_trait;
use futures::future::LocalBoxFuture;
use std::time::Duration;

/// Temporizadores y tareas en segundo plano (un solo hilo, cooperativo)
#[async_trait(?Send)]
pub trait Scheduler {
    async fn sleep(&self, duration: Duration);

    /// Lanza una tarea sin esperar su resultado
    fn spawn(&self, task: LocalBoxFuture<'static, ()>);
}

/// Scheduler del navegador: gloo-timers + spawn_local
#[derive(Clone, Default)]
pub struct BrowserScheduler;

#[async_trait(?Send)]
impl Scheduler for BrowserScheduler {
    async fn sleep(&self, duration: Duration) {
        let millis = u32::try_from(duration.as_millis()).unwrap_or(u32::MAX);
        gloo_timers::future::TimeoutFuture::new(millis).await;
    }

    fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
        wasm_bindgen_futures::spawn_local(task);
    }
}
