use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{Bounds, Path, PathGeometry, Point};

/// Display metadata for one node of the tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerStyle {
    #[serde(default)]
    pub stroke: Option<String>,
    #[serde(default)]
    pub stroke_width: Option<f64>,
    #[serde(default = "default_visible")]
    pub visible: bool,
}

fn default_visible() -> bool {
    true
}

impl Default for LayerStyle {
    fn default() -> Self {
        Self {
            stroke: None,
            stroke_width: None,
            visible: true,
        }
    }
}

/// One node of the drawing tree.
///
/// Paths and child origins are stored in this node's local frame. Paths and
/// children keep insertion order, which is the order every traversal uses.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GeometryModel {
    pub origin: Point,
    #[serde(default)]
    paths: Vec<(String, Path)>,
    #[serde(default)]
    models: Vec<(String, GeometryModel)>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<LayerStyle>,
}

/// A path converted to absolute coordinates, with the route of the node that
/// owns it.
#[derive(Debug, Clone, PartialEq)]
pub struct AbsolutePath {
    pub route: Vec<String>,
    pub id: String,
    pub path: Path,
}

/// Position of a node during [`GeometryModel::walk`].
#[derive(Debug, Clone, PartialEq)]
pub struct WalkContext {
    /// Child ids from the walked root down to this node.
    pub route: Vec<String>,
    /// Absolute origin of this node, its own origin included.
    pub offset: Point,
}

/// Converts a path stored under a node whose absolute origin is `offset`
/// into absolute coordinates.
pub fn to_absolute(offset: Point, path: &Path) -> Path {
    path.translated(offset)
}

/// Inverse of [`to_absolute`].
pub fn to_local(offset: Point, path: &Path) -> Path {
    path.translated(-offset)
}

impl GeometryModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_origin(origin: Point) -> Self {
        Self {
            origin,
            ..Self::default()
        }
    }

    /// Adds a path, replacing any existing path with the same id in place.
    pub fn add_path(&mut self, id: impl Into<String>, path: Path) {
        let id = id.into();
        match self.paths.iter_mut().find(|(existing, _)| *existing == id) {
            Some(slot) => slot.1 = path,
            None => self.paths.push((id, path)),
        }
    }

    pub fn path(&self, id: &str) -> Option<&Path> {
        self.paths.iter().find(|(k, _)| k == id).map(|(_, p)| p)
    }

    pub fn remove_path(&mut self, id: &str) -> Option<Path> {
        let index = self.paths.iter().position(|(k, _)| k == id)?;
        Some(self.paths.remove(index).1)
    }

    pub fn paths(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.paths.iter().map(|(id, p)| (id.as_str(), p))
    }

    pub fn paths_mut(&mut self) -> impl Iterator<Item = (&str, &mut Path)> {
        self.paths.iter_mut().map(|(id, p)| (id.as_str(), p))
    }

    pub fn path_count(&self) -> usize {
        self.paths.len()
    }

    /// Replaces all own paths. Later duplicates of an id win.
    pub fn set_paths(&mut self, paths: Vec<(String, Path)>) {
        self.paths.clear();
        self.extend_paths(paths);
    }

    /// Adds many paths with [`add_path`](Self::add_path) semantics in one
    /// pass over the existing ids.
    pub fn extend_paths<I>(&mut self, paths: I)
    where
        I: IntoIterator<Item = (String, Path)>,
    {
        let mut index: HashMap<String, usize> = self
            .paths
            .iter()
            .enumerate()
            .map(|(i, (id, _))| (id.clone(), i))
            .collect();
        for (id, path) in paths {
            match index.get(&id) {
                Some(&slot) => self.paths[slot].1 = path,
                None => {
                    index.insert(id.clone(), self.paths.len());
                    self.paths.push((id, path));
                }
            }
        }
    }

    pub fn take_paths(&mut self) -> Vec<(String, Path)> {
        std::mem::take(&mut self.paths)
    }

    pub fn retain_paths<F>(&mut self, mut keep: F)
    where
        F: FnMut(&str, &Path) -> bool,
    {
        self.paths.retain(|(id, p)| keep(id, p));
    }

    /// Adds a child, replacing any existing child with the same id in place.
    pub fn add_model(&mut self, id: impl Into<String>, model: GeometryModel) {
        let id = id.into();
        match self.models.iter_mut().find(|(existing, _)| *existing == id) {
            Some(slot) => slot.1 = model,
            None => self.models.push((id, model)),
        }
    }

    pub fn model(&self, id: &str) -> Option<&GeometryModel> {
        self.models.iter().find(|(k, _)| k == id).map(|(_, m)| m)
    }

    pub fn model_mut(&mut self, id: &str) -> Option<&mut GeometryModel> {
        self.models
            .iter_mut()
            .find(|(k, _)| k == id)
            .map(|(_, m)| m)
    }

    pub fn remove_model(&mut self, id: &str) -> Option<GeometryModel> {
        let index = self.models.iter().position(|(k, _)| k == id)?;
        Some(self.models.remove(index).1)
    }

    pub fn models(&self) -> impl Iterator<Item = (&str, &GeometryModel)> {
        self.models.iter().map(|(id, m)| (id.as_str(), m))
    }

    pub fn models_mut(&mut self) -> impl Iterator<Item = (&str, &mut GeometryModel)> {
        self.models.iter_mut().map(|(id, m)| (id.as_str(), m))
    }

    pub fn model_count(&self) -> usize {
        self.models.len()
    }

    pub fn take_models(&mut self) -> Vec<(String, GeometryModel)> {
        std::mem::take(&mut self.models)
    }

    /// First id of the form `<prefix>_<n>` (n from 1) not used by a child.
    pub fn unique_child_id(&self, prefix: &str) -> String {
        (1..)
            .map(|n| format!("{prefix}_{n}"))
            .find(|id| self.model(id).is_none())
            .unwrap_or_else(|| prefix.to_string())
    }

    /// Number of paths in this node and every descendant.
    pub fn total_path_count(&self) -> usize {
        self.paths.len()
            + self
                .models
                .iter()
                .map(|(_, m)| m.total_path_count())
                .sum::<usize>()
    }

    /// True when neither this node nor any descendant holds a path.
    pub fn is_empty(&self) -> bool {
        self.total_path_count() == 0
    }

    pub fn is_finite(&self) -> bool {
        self.origin.is_finite()
            && self.paths.iter().all(|(_, p)| p.is_finite())
            && self.models.iter().all(|(_, m)| m.is_finite())
    }

    /// Follows a route of child ids. An empty route is this node.
    pub fn descend(&self, route: &[String]) -> Option<&GeometryModel> {
        route
            .iter()
            .try_fold(self, |node, id| node.model(id))
    }

    pub fn descend_mut(&mut self, route: &[String]) -> Option<&mut GeometryModel> {
        let mut node = self;
        for id in route {
            node = node.model_mut(id)?;
        }
        Some(node)
    }

    /// Absolute origin of the node at `route`: the sum of its own origin and
    /// every ancestor origin, this node's included.
    pub fn absolute_origin_of(&self, route: &[String]) -> Option<Point> {
        let mut offset = self.origin;
        let mut node = self;
        for id in route {
            node = node.model(id)?;
            offset += node.origin;
        }
        Some(offset)
    }

    /// Depth-first pre-order walk. `base` is the absolute origin of this
    /// node's parent (zero for a root).
    pub fn walk<F>(&self, base: Point, visit: &mut F)
    where
        F: FnMut(&WalkContext, &GeometryModel),
    {
        let mut ctx = WalkContext {
            route: Vec::new(),
            offset: base + self.origin,
        };
        self.walk_inner(&mut ctx, visit);
    }

    fn walk_inner<F>(&self, ctx: &mut WalkContext, visit: &mut F)
    where
        F: FnMut(&WalkContext, &GeometryModel),
    {
        visit(ctx, self);
        for (id, child) in &self.models {
            let parent_offset = ctx.offset;
            ctx.route.push(id.clone());
            ctx.offset = parent_offset + child.origin;
            child.walk_inner(ctx, visit);
            ctx.route.pop();
            ctx.offset = parent_offset;
        }
    }

    /// Every path in the tree in absolute coordinates, in traversal order:
    /// a node's own paths before its children.
    pub fn absolute_paths(&self) -> Vec<AbsolutePath> {
        let mut out = Vec::with_capacity(self.total_path_count());
        self.walk(Point::ORIGIN, &mut |ctx, node| {
            for (id, path) in &node.paths {
                out.push(AbsolutePath {
                    route: ctx.route.clone(),
                    id: id.clone(),
                    path: to_absolute(ctx.offset, path),
                });
            }
        });
        out
    }

    /// Absolute bounds of every path in the tree.
    pub fn bounds(&self) -> Option<Bounds> {
        self.absolute_paths()
            .iter()
            .map(|p| p.path.bounds())
            .reduce(|a, b| a.union(&b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nested() -> GeometryModel {
        let mut inner = GeometryModel::with_origin(Point::new(5.0, 5.0));
        inner.add_path("l", Path::line(Point::ORIGIN, Point::new(1.0, 0.0)));
        let mut middle = GeometryModel::with_origin(Point::new(10.0, 0.0));
        middle.add_model("inner", inner);
        let mut root = GeometryModel::with_origin(Point::new(1.0, 1.0));
        root.add_path("r", Path::circle(Point::ORIGIN, 2.0));
        root.add_model("middle", middle);
        root
    }

    #[test]
    fn test_absolute_paths_sum_all_origins() {
        let abs = nested().absolute_paths();
        assert_eq!(abs.len(), 2);
        assert_eq!(abs[0].id, "r");
        assert_eq!(abs[0].path, Path::circle(Point::new(1.0, 1.0), 2.0));
        assert_eq!(abs[1].route, vec!["middle".to_string(), "inner".to_string()]);
        assert_eq!(
            abs[1].path,
            Path::line(Point::new(16.0, 6.0), Point::new(17.0, 6.0))
        );
    }

    #[test]
    fn test_absolute_origin_of_route() {
        let root = nested();
        let route = vec!["middle".to_string(), "inner".to_string()];
        assert_eq!(root.absolute_origin_of(&route), Some(Point::new(16.0, 6.0)));
        assert_eq!(root.absolute_origin_of(&[]), Some(Point::new(1.0, 1.0)));
        assert!(root.absolute_origin_of(&["missing".to_string()]).is_none());
    }

    #[test]
    fn test_add_path_replaces_in_place() {
        let mut m = GeometryModel::new();
        m.add_path("a", Path::line(Point::ORIGIN, Point::new(1.0, 0.0)));
        m.add_path("b", Path::line(Point::ORIGIN, Point::new(2.0, 0.0)));
        m.add_path("a", Path::line(Point::ORIGIN, Point::new(3.0, 0.0)));
        let ids: Vec<&str> = m.paths().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(m.path("a").map(|p| p.length()), Some(3.0));
    }

    #[test]
    fn test_extend_paths_matches_add_path() {
        let mut m = GeometryModel::new();
        m.add_path("a", Path::line(Point::ORIGIN, Point::new(1.0, 0.0)));
        m.extend_paths(vec![
            ("b".to_string(), Path::line(Point::ORIGIN, Point::new(2.0, 0.0))),
            ("a".to_string(), Path::line(Point::ORIGIN, Point::new(3.0, 0.0))),
            ("b".to_string(), Path::line(Point::ORIGIN, Point::new(4.0, 0.0))),
        ]);
        let ids: Vec<&str> = m.paths().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(m.path("a").map(|p| p.length()), Some(3.0));
        assert_eq!(m.path("b").map(|p| p.length()), Some(4.0));
    }

    #[test]
    fn test_set_paths_large_batch_keeps_order() {
        let count = 200_000;
        let paths: Vec<(String, Path)> = (0..count)
            .map(|i| {
                let y = i as f64;
                (format!("p_{i}"), Path::line(Point::new(0.0, y), Point::new(1.0, y)))
            })
            .collect();
        let mut m = GeometryModel::new();
        m.add_path("stale", Path::circle(Point::ORIGIN, 1.0));
        m.set_paths(paths);
        assert_eq!(m.path_count(), count);
        assert!(m.path("stale").is_none());
        assert_eq!(m.paths().next().map(|(id, _)| id), Some("p_0"));
        assert_eq!(m.paths().last().map(|(id, _)| id), Some("p_199999"));
    }

    #[test]
    fn test_unique_child_id() {
        let mut m = GeometryModel::new();
        assert_eq!(m.unique_child_id("fill"), "fill_1");
        m.add_model("fill_1", GeometryModel::new());
        assert_eq!(m.unique_child_id("fill"), "fill_2");
    }

    #[test]
    fn test_local_absolute_roundtrip() {
        let offset = Point::new(3.0, -2.0);
        let p = Path::arc(Point::new(1.0, 1.0), 4.0, 10.0, 80.0);
        assert_eq!(to_local(offset, &to_absolute(offset, &p)), p);
    }
}
