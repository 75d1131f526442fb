use plotkit_core::{to_absolute, to_local, Bounds, GeometryModel, Path, PathGeometry, Point};
use proptest::prelude::*;

fn coord() -> impl Strategy<Value = f64> {
    -1000.0..1000.0f64
}

fn point() -> impl Strategy<Value = Point> {
    (coord(), coord()).prop_map(|(x, y)| Point::new(x, y))
}

fn bounds() -> impl Strategy<Value = Bounds> {
    (point(), point()).prop_map(|(a, b)| {
        Bounds::new(
            Point::new(a.x.min(b.x), a.y.min(b.y)),
            Point::new(a.x.max(b.x), a.y.max(b.y)),
        )
    })
}

fn path() -> impl Strategy<Value = Path> {
    prop_oneof![
        (point(), point()).prop_map(|(a, b)| Path::line(a, b)),
        (point(), 0.1..200.0f64, 0.0..360.0f64, 1.0..359.0f64)
            .prop_map(|(c, r, start, sweep)| Path::arc(c, r, start, start + sweep)),
        (point(), 0.1..200.0f64).prop_map(|(c, r)| Path::circle(c, r)),
    ]
}

proptest! {
    #[test]
    fn prop_union_contains_both(a in bounds(), b in bounds()) {
        let u = a.union(&b);
        for corner in [a.min, a.max, b.min, b.max] {
            prop_assert!(u.contains(corner));
        }
    }

    #[test]
    fn prop_local_absolute_roundtrip(offset in point(), p in path()) {
        let back = to_local(offset, &to_absolute(offset, &p));
        let (a, b) = (back.bounds(), p.bounds());
        prop_assert!(a.min.approx_eq(&b.min, 1e-6) && a.max.approx_eq(&b.max, 1e-6));
    }

    #[test]
    fn prop_nested_offsets_compose(outer in point(), inner in point(), p in path()) {
        let mut child = GeometryModel::with_origin(inner);
        child.add_path("p", p.clone());
        let mut root = GeometryModel::with_origin(outer);
        root.add_model("child", child);

        let abs = root.absolute_paths();
        prop_assert_eq!(abs.len(), 1);
        let direct = to_absolute(outer + inner, &p).bounds();
        let walked = abs[0].path.bounds();
        prop_assert!(walked.min.approx_eq(&direct.min, 1e-6));
        prop_assert!(walked.max.approx_eq(&direct.max, 1e-6));
    }
}
