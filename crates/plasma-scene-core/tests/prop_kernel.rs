//! Property-based tests for the scene kernel.

use std::f64::consts::PI;

use plasma_scene_core::transform::{rotate_z, translate};
use plasma_scene_core::*;
use proptest::prelude::*;

proptest! {
    /// A point stays inside a solid when both are moved by the same transform.
    #[test]
    fn containment_is_frame_independent(
        angle in -360.0f64..360.0,
        dx in -5.0f64..5.0,
        dz in -5.0f64..5.0,
        x in -2.0f64..2.0,
        y in -2.0f64..2.0,
        z in -1.0f64..3.0,
    ) {
        let base = Solid::subtract(
            Solid::cylinder(1.5, 2.0).unwrap(),
            Solid::cylinder(0.5, 2.0).unwrap(),
        );
        let motion = translate(dx, 0.0, dz) * rotate_z(angle);
        let moved = base.clone().with_transform(motion);
        let p = DVec3::new(x, y, z);
        let r = x.hypot(y);
        // skip points within rounding distance of a surface
        let near_surface = (r - 0.5).abs() < 1e-9
            || (r - 1.5).abs() < 1e-9
            || z.abs() < 1e-9
            || (z - 2.0).abs() < 1e-9;
        prop_assume!(!near_surface);
        prop_assert_eq!(base.contains(p), moved.contains(motion.transform_point3(p)));
    }

    /// An axisymmetric field does not depend on the toroidal angle.
    #[test]
    fn axisymmetric_field_is_rotation_invariant(
        r in 0.0f64..3.0,
        z in -2.0f64..2.0,
        phi in 0.0f64..(2.0 * PI),
    ) {
        let mapper = AxisymmetricMapper::new(|r: f64, z: f64| r * r - z);
        let value = mapper.evaluate(r * phi.cos(), r * phi.sin(), z);
        prop_assert!((value - (r * r - z)).abs() < 1e-9);
    }

    /// Integrating a uniform emitter yields emission times length for any step.
    #[test]
    fn uniform_integral_independent_of_step(
        step in 0.001f64..2.0,
        length in 0.0f64..5.0,
        power in 0.0f64..1e6,
    ) {
        let material = RadiationFunction::new(move |_: f64, _: f64, _: f64| power, step).unwrap();
        let start = DVec3::new(0.1, -0.2, 0.3);
        let end = start + DVec3::new(1.0, 2.0, -2.0).normalize() * length;
        let expected = power / (4.0 * PI) * length;
        let got = material.integrate(start, end);
        prop_assert!((got - expected).abs() <= 1e-9 * expected.max(1.0), "{} vs {}", got, expected);
    }

    /// Removing a group removes every instance below it and nothing else.
    #[test]
    fn remove_subtree_counts(instances in 0usize..20, others in 0usize..5) {
        let mut scene = Scene::new();
        let root = scene.root();
        let solid = scene.add_solid(Solid::cylinder(1.0, 1.0).unwrap());
        let group = scene.add_group("group", root, DAffine3::IDENTITY).unwrap();
        for i in 0..instances {
            scene.instance(format!("a{i}"), solid, None, group, DAffine3::IDENTITY).unwrap();
        }
        for i in 0..others {
            scene.instance(format!("b{i}"), solid, None, root, DAffine3::IDENTITY).unwrap();
        }
        prop_assert_eq!(scene.remove_subtree(group).unwrap(), instances + 1);
        prop_assert_eq!(scene.children(root).len(), others);
        prop_assert_eq!(scene.primitives().count(), others);
    }
}
