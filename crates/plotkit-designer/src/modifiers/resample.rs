use plotkit_core::model::segment_count;
use plotkit_core::{GeometryModel, Path, PathGeometry, PipelineResult, Point};
use tracing::debug;

use super::{check_flatten_budget, rewrite_paths};

/// Rewrites every path in the tree as lines no longer than `detail`.
///
/// Curves are always flattened. Lines longer than `detail` are re-split into
/// equal pieces; shorter lines keep their id untouched, so resampling twice
/// at the same detail leaves the model as it was.
pub fn resample(model: &mut GeometryModel, detail: f64) -> PipelineResult<()> {
    check_flatten_budget(model, detail, true)?;
    let before = model.total_path_count();
    rewrite_paths(model, Point::ORIGIN, &mut |path, _| {
        Ok(match path {
            Path::Line(_) if segment_count(path.length(), detail) == 1 => vec![path.clone()],
            _ => path.to_lines(detail).into_iter().map(Path::Line).collect(),
        })
    })?;
    debug!(
        "resample: {before} -> {} paths at {detail} mm",
        model.total_path_count()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resample_is_idempotent() {
        let mut model = GeometryModel::new();
        model.add_path("l", Path::line(Point::ORIGIN, Point::new(40.0, 0.0)));
        model.add_path("a", Path::arc(Point::ORIGIN, 10.0, 0.0, 90.0));
        model.add_path("c", Path::circle(Point::new(50.0, 50.0), 5.0));
        resample(&mut model, 2.0).unwrap();
        let once = model.clone();
        resample(&mut model, 2.0).unwrap();
        assert_eq!(model, once);
        assert!(model.paths().all(|(_, p)| matches!(p, Path::Line(_))));
        assert!(model.paths().all(|(_, p)| p.length() <= 2.0 + 1e-9));
    }

    #[test]
    fn test_short_line_keeps_id() {
        let mut model = GeometryModel::new();
        model.add_path("short", Path::line(Point::ORIGIN, Point::new(0.5, 0.0)));
        resample(&mut model, 1.0).unwrap();
        assert!(model.path("short").is_some());
    }

    #[test]
    fn test_microscopic_detail_is_rejected_untouched() {
        let mut model = GeometryModel::new();
        model.add_path("l", Path::line(Point::ORIGIN, Point::new(100.0, 0.0)));
        let before = model.clone();
        let err = resample(&mut model, 1e-9).unwrap_err();
        assert!(matches!(err, plotkit_core::PipelineError::Parameter(_)));
        assert_eq!(model, before);
    }
}
