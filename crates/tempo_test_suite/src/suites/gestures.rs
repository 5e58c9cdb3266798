//! Hover and tap scenarios

use crate::runner::TestSuite;
use anyhow::ensure;
use tempo_animation::testing::Call;
use tempo_animation::{geometric_identity, KeyframeDefinition, PlaybackControls};

fn release_duration(call: &Call) -> Option<f64> {
    match call {
        Call::Animate { options, .. } => options.duration,
        _ => None,
    }
}

/// Create the gesture suite
pub fn suite() -> TestSuite {
    let mut suite = TestSuite::new("gestures");

    suite.add("hover_release_mirrors_elapsed", |ctx| {
        let Some(duration) = ctx.preset().duration else {
            ctx.skip("preset has no duration");
            return Ok(());
        };
        ctx.graph().batch(|_| {
            ctx.inputs().transition.set(ctx.preset());
            ctx.inputs()
                .hover
                .set(Some(KeyframeDefinition::new().set("scale", 1.1)));
        });

        ctx.binding().on_pointer_enter()?;
        let elapsed = duration * 0.4;
        ctx.nth_handle(0)?.set_time(elapsed);
        ctx.binding().on_pointer_leave()?;

        ctx.expect_calls(&["animate", "stop", "animate"])?;
        let animates = ctx.calls_of("animate");
        ensure!(
            release_duration(&animates[1]) == Some(elapsed),
            "release lasted {:?}",
            release_duration(&animates[1])
        );
        match &animates[1] {
            Call::Animate { keyframes, .. } => {
                ensure!(*keyframes == geometric_identity(), "release target {:?}", keyframes)
            }
            other => anyhow::bail!("unexpected call {:?}", other),
        }
        ctx.expect_published(ctx.nth_handle(1)?.id())
    });

    suite.add("leave_releases_hover_then_tap", |ctx| {
        ctx.graph().batch(|_| {
            ctx.inputs().transition.set(ctx.preset());
            ctx.inputs()
                .hover
                .set(Some(KeyframeDefinition::new().set("scale", 1.1)));
            ctx.inputs()
                .tap
                .set(Some(KeyframeDefinition::new().set("scale", 0.9)));
        });

        ctx.binding().on_pointer_enter()?;
        ctx.binding().on_pointer_down()?;
        ctx.nth_handle(0)?.set_time(0.2);
        ctx.nth_handle(1)?.set_time(0.1);
        ctx.binding().on_pointer_leave()?;

        let durations: Vec<_> = ctx
            .calls_of("animate")
            .iter()
            .skip(2)
            .map(release_duration)
            .collect();
        ensure!(
            durations == vec![Some(0.2), Some(0.1)],
            "release durations {:?}",
            durations
        );
        Ok(())
    });

    suite.add("touch_press_cycle", |ctx| {
        ctx.inputs()
            .tap
            .set(Some(KeyframeDefinition::new().set("scale", 0.95)));

        ctx.binding().on_touch_start()?;
        ctx.binding().on_touch_end()?;
        ctx.binding().on_touch_start()?;
        ctx.binding().on_touch_cancel()?;

        ctx.expect_calls(&[
            "animate", "stop", "animate", "stop", "animate", "stop", "animate",
        ])
    });

    suite.add("gestures_inert_after_dispose", |ctx| {
        ctx.inputs()
            .hover
            .set(Some(KeyframeDefinition::new().set("scale", 1.1)));
        ctx.binding().on_pointer_enter()?;
        ctx.binding().dispose();
        ctx.binding().on_pointer_leave()?;

        ctx.expect_calls(&["animate", "stop"])
    });

    suite
}
