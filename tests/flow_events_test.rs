// Runs one flow through every lifecycle output: async events delivered to
// `on_custom_events`, async state mutations and a custom draw closure.
#[test]
#[cfg(feature = "integration-tests")]
fn should_deliver_events_mutations_and_custom_draws() {
    use std::{cell::Cell, future::Future, time::Duration};

    use flow_labs::{
        config::DemoConfig,
        context::{Context, InitContext},
        flow::{self, GraphicsFlow, ImageTestResult, Out, constructor},
        render::Render,
    };

    #[derive(Debug, PartialEq)]
    struct Ping(u32);

    #[derive(Default)]
    struct Log {
        pings: Vec<u32>,
        mutations: u32,
        updates: u32,
    }

    struct Lifecycle {
        custom_draws: Cell<u32>,
    }

    impl GraphicsFlow<Log, Ping> for Lifecycle {
        fn on_init(&mut self, _: &mut Context, _: &mut Log) -> Out<Log, Ping> {
            let first: Box<dyn Future<Output = Ping>> = Box::new(async { Ping(1) });
            let second: Box<dyn Future<Output = Ping>> = Box::new(async { Ping(2) });
            Out::FutEvent(vec![first, second])
        }

        fn on_update(&mut self, _: &Context, state: &mut Log, _: Duration) -> Out<Log, Ping> {
            state.updates += 1;
            if state.updates > 1 {
                return Out::Empty;
            }
            let mutation: Box<dyn Future<Output = Box<dyn FnOnce(&mut Log)>>> = Box::new(async {
                let bump: Box<dyn FnOnce(&mut Log)> = Box::new(|log: &mut Log| log.mutations += 1);
                bump
            });
            Out::FutFn(vec![mutation])
        }

        fn on_custom_events(&mut self, _: &Context, state: &mut Log, event: Ping) -> Option<Ping> {
            state.pings.push(event.0);
            None
        }

        fn on_render<'pass>(&self) -> Render<'_, 'pass> {
            Render::Custom(Box::new(move |_: &Context, _: &mut wgpu::RenderPass<'pass>| {
                self.custom_draws.set(self.custom_draws.get() + 1)
            }))
        }

        fn render_to_texture(
            &self,
            _: &Context,
            state: &mut Log,
            _: &mut image::ImageBuffer<image::Rgba<u8>, wgpu::BufferView>,
        ) -> Result<ImageTestResult, anyhow::Error> {
            if state.mutations > 1 || state.pings.len() > 2 {
                return Ok(ImageTestResult::Failed);
            }
            let mut pings = state.pings.clone();
            pings.sort_unstable();
            if pings == [1, 2] && state.mutations == 1 && self.custom_draws.get() > 0 {
                Ok(ImageTestResult::Passed)
            } else {
                Ok(ImageTestResult::Waiting)
            }
        }
    }

    let config = DemoConfig::titled("lifecycle");
    flow::run::<Log, Ping>(
        config,
        vec![constructor(|_: InitContext| async move {
            Ok(Lifecycle {
                custom_draws: Cell::new(0),
            })
        })],
    )
    .expect("lifecycle flow failed");
}
