//! Scroll trigger scenarios

use super::fade;
use crate::runner::TestSuite;
use anyhow::ensure;
use std::cell::RefCell;
use std::rc::Rc;
use tempo_animation::testing::{Call, LinkedSubject};
use tempo_animation::{
    PlaybackControls, ScrollAxis, ScrollInfo, ScrollOptions, Segment, TransitionOptions,
};
use tempo_motion::ScrollInput;

/// Create the scroll trigger suite
pub fn suite() -> TestSuite {
    let mut suite = TestSuite::new("scroll");

    suite.add("scroll_sequence_links_handle", |ctx| {
        let sequence = vec![
            Segment::keyframes(ctx.host(), fade(1.0))
                .with_transition(TransitionOptions::new().duration(1.0)),
            Segment::keyframes(ctx.host(), fade(0.5))
                .with_transition(TransitionOptions::new().duration(1.0)),
        ];
        ctx.graph().batch(|_| {
            ctx.inputs()
                .scroll_options
                .set(ScrollOptions::new().axis(ScrollAxis::Y));
            ctx.inputs().scroll.set(Some(sequence.into()));
        });

        ctx.expect_calls(&["sequence", "scroll-link"])?;
        let handle = ctx.nth_handle(0)?.id();
        match &ctx.calls_of("scroll-link")[0] {
            Call::ScrollLink {
                subject, options, ..
            } => {
                ensure!(
                    *subject == LinkedSubject::Animation(Some(handle)),
                    "linked {:?}",
                    subject
                );
                ensure!(options.axis == ScrollAxis::Y, "axis {:?}", options.axis);
            }
            other => anyhow::bail!("unexpected call {:?}", other),
        }
        ctx.expect_published(handle)
    });

    suite.add("scroll_callback_skips_engine", |ctx| {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        ctx.inputs()
            .scroll
            .set(Some(ScrollInput::progress(move |progress, _| {
                sink.borrow_mut().push(progress);
            })));

        ctx.expect_calls(&["scroll-link"])?;
        ctx.fakes().scroll.emit_progress(0.5, &ScrollInfo::default());
        ensure!(*seen.borrow() == vec![0.5], "callback saw {:?}", seen.borrow());
        ensure!(ctx.published().is_none(), "callbacks publish nothing");
        Ok(())
    });

    suite.add("scroll_progress_scrubs_animation", |ctx| {
        ctx.inputs().transition.set(ctx.preset());
        ctx.inputs().scroll.set(Some(fade(1.0).into()));

        ctx.fakes().scroll.emit_progress(0.5, &ScrollInfo::default());
        let handle = ctx.nth_handle(0)?;
        let expected = handle.duration() * 0.5;
        ensure!(handle.time() == expected, "time {} != {}", handle.time(), expected);
        Ok(())
    });

    suite.add("scroll_reset_unlinks_once", |ctx| {
        ctx.inputs().scroll.set(Some(fade(1.0).into()));
        ctx.inputs().scroll.set(Some(fade(0.0).into()));

        ctx.expect_calls(&[
            "animate",
            "scroll-link",
            "scroll-unlink",
            "stop",
            "animate",
            "scroll-link",
        ])?;
        ensure!(ctx.fakes().scroll.active_links() == 1, "one live link");
        Ok(())
    });

    suite
}
