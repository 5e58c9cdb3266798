//! Direct trigger scenarios

use super::fade;
use crate::runner::TestSuite;
use anyhow::ensure;
use tempo_animation::testing::Call;
use tempo_animation::{AnimationTarget, KeyframeDefinition, PlaybackControls, Segment, SequenceOptions};

/// Create the direct trigger suite
pub fn suite() -> TestSuite {
    let mut suite = TestSuite::new("direct");

    suite.add("direct_keyframes_on_host", |ctx| {
        let keyframes = KeyframeDefinition::new().set("x", 100.0).set("opacity", 1.0);
        ctx.graph().batch(|_| {
            ctx.inputs().transition.set(ctx.preset());
            ctx.inputs().animate.set(Some(keyframes.clone().into()));
        });

        ctx.expect_calls(&["animate"])?;
        match &ctx.calls_of("animate")[0] {
            Call::Animate {
                target,
                keyframes: sent,
                options,
                handle,
            } => {
                ensure!(*target == AnimationTarget::Element(ctx.host()), "target {:?}", target);
                ensure!(*sent == keyframes, "keyframes changed in transit");
                ensure!(*options == ctx.preset(), "transition changed in transit");
                ctx.expect_published(*handle)
            }
            other => anyhow::bail!("unexpected call {:?}", other),
        }
    });

    suite.add("direct_reset_stops_previous", |ctx| {
        ctx.inputs().animate.set(Some(fade(1.0).into()));
        ctx.inputs().animate.set(Some(fade(0.0).into()));

        ctx.expect_calls(&["animate", "stop", "animate"])?;
        let first = ctx.nth_handle(0)?;
        ensure!(first.stop_count() == 1, "first handle stopped {} times", first.stop_count());
        ctx.expect_published(ctx.nth_handle(1)?.id())
    });

    suite.add("direct_sequence_uses_sequence_options", |ctx| {
        let options = SequenceOptions::new().duration(ctx.preset_duration() * 2.0);
        let sequence = vec![
            Segment::keyframes(ctx.host(), fade(1.0)),
            Segment::keyframes(ctx.host(), fade(0.0)),
        ];
        ctx.graph().batch(|_| {
            ctx.inputs().sequence.set(options.clone());
            ctx.inputs().animate.set(Some(sequence.into()));
        });

        ctx.expect_calls(&["sequence"])?;
        match &ctx.calls_of("sequence")[0] {
            Call::AnimateSequence { options: sent, .. } => {
                ensure!(*sent == options, "sequence options {:?}", sent);
                Ok(())
            }
            other => anyhow::bail!("unexpected call {:?}", other),
        }
    });

    suite.add("direct_unset_stops", |ctx| {
        ctx.inputs().animate.set(Some(fade(1.0).into()));
        ctx.inputs().animate.set(None);

        ctx.expect_calls(&["animate", "stop"])?;
        let handle = ctx.nth_handle(0)?;
        ensure!(!handle.state().is_active(), "handle still {:?}", handle.state());
        Ok(())
    });

    suite
}
