/// PROPERTY-BASED TESTS: keyframe reduction
///
/// Key invariants:
/// 1. Reduction only ever removes trailing samples
/// 2. A reduced curve never ends on two near-equal samples
/// 3. A curve that holds one value is removed entirely

use proptest::prelude::*;
use scenesync_shared::{
    reduce_curve, Animation, AnimationClip, NearEqual, TransformAnimation, TVP,
};

fn curve_strategy() -> impl Strategy<Value = Vec<TVP<f32>>> {
    prop::collection::vec(prop::sample::select(vec![0.0f32, 1.0, 2.5]), 0..24).prop_map(
        |values| {
            values
                .into_iter()
                .enumerate()
                .map(|(index, value)| TVP::new(index as f32 / 30.0, value))
                .collect()
        },
    )
}

proptest! {
    #[test]
    fn prop_reduction_keeps_a_prefix(curve in curve_strategy()) {
        let mut reduced = curve.clone();
        reduce_curve(&mut reduced);

        prop_assert!(reduced.len() <= curve.len());
        prop_assert_eq!(&curve[..reduced.len()], &reduced[..]);
    }

    #[test]
    fn prop_reduced_curve_ends_on_a_change(curve in curve_strategy()) {
        let mut reduced = curve;
        reduce_curve(&mut reduced);

        prop_assert!(reduced.len() != 1);
        if reduced.len() >= 2 {
            let last = reduced.len() - 1;
            prop_assert!(!reduced[last].value.near_equal(&reduced[last - 1].value));
        }
    }

    #[test]
    fn prop_constant_curves_vanish(value in -100.0f32..100.0, samples in 1usize..30) {
        let mut curve: Vec<TVP<f32>> = (0..samples)
            .map(|index| TVP::new(index as f32, value))
            .collect();
        reduce_curve(&mut curve);
        prop_assert!(curve.is_empty());
    }
}

#[test]
fn reduction_stops_at_the_last_change() {
    let mut curve = vec![
        TVP::new(0.0, 0.0f32),
        TVP::new(1.0, 1.0),
        TVP::new(2.0, 1.0),
        TVP::new(3.0, 1.0),
    ];
    reduce_curve(&mut curve);
    assert_eq!(curve, vec![TVP::new(0.0, 0.0), TVP::new(1.0, 1.0)]);
}

#[test]
fn reduction_clears_static_curves_only() {
    use glam::Vec3;

    let mut animation = TransformAnimation::new("/root");
    animation.translation = vec![TVP::new(0.0, Vec3::X), TVP::new(1.0, Vec3::X)];
    animation.visible = vec![TVP::new(0.0, true), TVP::new(1.0, false)];

    let mut clip = AnimationClip::new("clip", 30.0);
    clip.animations.push(Animation::Transform(animation));
    clip.reduce();
    assert!(!clip.is_empty());

    match &clip.animations[0] {
        Animation::Transform(animation) => {
            assert!(animation.translation.is_empty());
            assert_eq!(animation.visible.len(), 2);
        }
        other => panic!("unexpected {:?}", other),
    }
}
