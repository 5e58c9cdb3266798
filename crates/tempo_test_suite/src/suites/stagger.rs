//! Stagger scenarios

use super::fade;
use crate::runner::TestSuite;
use anyhow::ensure;
use tempo_animation::testing::Call;
use tempo_animation::{stagger, AnimationTarget, StaggerOptions, StaggerOrigin};

/// Create the stagger suite
pub fn suite() -> TestSuite {
    let mut suite = TestSuite::new("stagger");

    suite.add("stagger_targets_children", |ctx| {
        ctx.set_children(5);
        ctx.inputs()
            .transition
            .set(ctx.preset().delay(stagger(0.1, StaggerOptions::new())));
        ctx.inputs().animate.set(Some(fade(1.0).into()));

        match &ctx.calls_of("animate")[..] {
            [Call::Animate {
                target: AnimationTarget::Elements(elements),
                options,
                ..
            }] => {
                ensure!(elements.len() == 5, "{} targets", elements.len());
                let delay = options
                    .delay
                    .as_ref()
                    .ok_or_else(|| anyhow::anyhow!("delay dropped"))?;
                let last = delay.for_index(4, 5);
                ensure!((last - 0.4).abs() < 1e-9, "last delay {}", last);
                Ok(())
            }
            other => anyhow::bail!("unexpected calls {:?}", other),
        }
    });

    suite.add("stagger_from_center", |ctx| {
        ctx.set_children(5);
        ctx.inputs().transition.set(
            ctx.preset()
                .delay(stagger(0.1, StaggerOptions::new().origin(StaggerOrigin::Center))),
        );
        ctx.inputs().animate.set(Some(fade(1.0).into()));

        match &ctx.calls_of("animate")[..] {
            [Call::Animate { options, .. }] => {
                let delay = options
                    .delay
                    .as_ref()
                    .ok_or_else(|| anyhow::anyhow!("delay dropped"))?;
                let delays: Vec<f64> = (0..5).map(|i| delay.for_index(i, 5)).collect();
                ensure!(delays[2] == 0.0, "center starts first: {:?}", delays);
                ensure!(
                    (delays[0] - delays[4]).abs() < 1e-9,
                    "edges start together: {:?}",
                    delays
                );
                Ok(())
            }
            other => anyhow::bail!("unexpected calls {:?}", other),
        }
    });

    suite.add("stagger_without_children_falls_back", |ctx| {
        ctx.inputs()
            .transition
            .set(ctx.preset().delay(stagger(0.1, StaggerOptions::new())));
        ctx.inputs().animate.set(Some(fade(1.0).into()));

        match &ctx.calls_of("animate")[..] {
            [Call::Animate { target, .. }] => {
                ensure!(
                    *target == AnimationTarget::Element(ctx.host()),
                    "target {:?}",
                    target
                );
                Ok(())
            }
            other => anyhow::bail!("unexpected calls {:?}", other),
        }
    });

    suite.add("constant_delay_never_staggers", |ctx| {
        ctx.set_children(3);
        ctx.inputs().transition.set(ctx.preset().delay(0.25));
        ctx.inputs().animate.set(Some(fade(1.0).into()));

        ensure!(
            matches!(
                &ctx.calls_of("animate")[..],
                [Call::Animate { target: AnimationTarget::Element(_), .. }]
            ),
            "constant delay animated {:?}",
            ctx.trace()
        );
        Ok(())
    });

    suite
}
