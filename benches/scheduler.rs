use std::time::Duration;

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use foyer::logging::{LogEvent, LogSink};
use foyer::{
    Logger, LoggingResult, NullHost, PresentationRequest, PresentationScheduler, SchedulerConfig,
};

#[derive(Clone, Default)]
struct NullSink;

impl LogSink for NullSink {
    fn log(&self, _event: &LogEvent) -> LoggingResult<()> {
        Ok(())
    }
}

fn build_scheduler() -> PresentationScheduler {
    let mut config = SchedulerConfig::default();
    config.logger = Some(Logger::new(NullSink));
    config.metrics_interval = Duration::from_millis(0);
    config.enable_metrics();
    PresentationScheduler::with_config(
        Box::new(NullHost::new()),
        Box::new(foyer::OverlayPrecedencePolicy),
        config,
    )
}

fn modal_churn(c: &mut Criterion) {
    c.bench_function("modal_churn", |b| {
        b.iter(|| {
            let mut scheduler = build_scheduler();
            for round in 0..100u32 {
                let id = format!("m{round}");
                let priority = (round % 7) as i32;
                let _ticket = scheduler
                    .open(black_box(PresentationRequest::modal(&id, priority)))
                    .expect("open");
                scheduler.close(&id, None).expect("close");
            }
        });
    });
}

fn overlay_over_modal_churn(c: &mut Criterion) {
    c.bench_function("overlay_over_modal_churn", |b| {
        b.iter(|| {
            let mut scheduler = build_scheduler();
            let _modal = scheduler
                .open(PresentationRequest::modal("backdrop", 0))
                .expect("open modal");
            for round in 0..100u32 {
                let id = format!("o{round}");
                let _ticket = scheduler
                    .open(black_box(PresentationRequest::overlay(&id, 1)))
                    .expect("open overlay");
                scheduler.close(&id, None).expect("close overlay");
            }
            scheduler.close_all();
        });
    });
}

fn deep_queue_drain(c: &mut Criterion) {
    c.bench_function("deep_queue_drain", |b| {
        b.iter(|| {
            let mut scheduler = build_scheduler();
            let mut ids = Vec::with_capacity(64);
            for round in 0..64u32 {
                let id = format!("q{round}");
                let priority = (round % 11) as i32;
                let _ticket = scheduler
                    .open(PresentationRequest::modal(&id, priority))
                    .expect("open");
                ids.push(id);
            }
            while let Some(active) = scheduler
                .active_id(foyer::PresentationClass::Modal)
                .map(str::to_string)
            {
                scheduler.close(&active, None).expect("close");
            }
            black_box(scheduler.snapshot());
        });
    });
}

criterion_group!(benches, modal_churn, overlay_over_modal_churn, deep_queue_drain);
criterion_main!(benches);
