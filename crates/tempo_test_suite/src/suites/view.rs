//! View trigger scenarios

use super::fade;
use crate::runner::TestSuite;
use anyhow::ensure;
use std::cell::Cell;
use std::rc::Rc;
use tempo_animation::{AnimationTarget, ViewAmount, ViewEntry, ViewOptions};
use tempo_animation::testing::Call;
use tempo_motion::ViewInput;

/// Create the view trigger suite
pub fn suite() -> TestSuite {
    let mut suite = TestSuite::new("view");

    suite.add("view_enter_exit_cycle", |ctx| {
        ctx.inputs().view.set(Some(fade(1.0).into()));
        ctx.expect_calls(&["view-link"])?;

        ctx.fakes().view.enter(ctx.host());
        ctx.fakes().view.exit(ctx.host());
        ctx.fakes().view.enter(ctx.host());

        ctx.expect_calls(&["view-link", "animate", "stop", "animate"])?;
        ctx.expect_published(ctx.nth_handle(1)?.id())
    });

    suite.add("view_options_forwarded", |ctx| {
        let options = ViewOptions::new()
            .margin("0px 0px -20% 0px")
            .amount(ViewAmount::All);
        ctx.graph().batch(|_| {
            ctx.inputs().view_options.set(options.clone());
            ctx.inputs().view.set(Some(fade(1.0).into()));
        });

        match &ctx.calls_of("view-link")[..] {
            [Call::ViewLink {
                target,
                options: sent,
                ..
            }] => {
                ensure!(*target == ctx.host(), "linked {}", target);
                ensure!(*sent == options, "options {:?}", sent);
                Ok(())
            }
            other => anyhow::bail!("unexpected calls {:?}", other),
        }
    });

    suite.add("view_children_read_at_enter", |ctx| {
        ctx.inputs().transition.set(
            ctx.preset()
                .delay(tempo_animation::Delay::per_index(|i, _| i as f64 * 0.05)),
        );
        ctx.inputs().view.set(Some(fade(1.0).into()));

        ctx.set_children(4);
        ctx.fakes().view.enter(ctx.host());

        match &ctx.calls_of("animate")[..] {
            [Call::Animate {
                target: AnimationTarget::Elements(elements),
                ..
            }] => {
                ensure!(elements.len() == 4, "{} children animated", elements.len());
                Ok(())
            }
            other => anyhow::bail!("unexpected calls {:?}", other),
        }
    });

    suite.add("view_custom_enter_handler", |ctx| {
        let entered = Rc::new(Cell::new(0));
        let counter = entered.clone();
        ctx.inputs()
            .view
            .set(Some(ViewInput::on_enter(move |_: &ViewEntry| {
                counter.set(counter.get() + 1);
                None
            })));

        ctx.fakes().view.enter(ctx.host());
        ensure!(entered.get() == 1, "entered {} times", entered.get());
        ensure!(ctx.fakes().log.engine_calls().is_empty(), "engine untouched");
        Ok(())
    });

    suite
}
