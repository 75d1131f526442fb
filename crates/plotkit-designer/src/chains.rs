//! Chain finder.
//!
//! Groups paths whose endpoints meet into ordered chains. Everything here
//! runs in **absolute** coordinates: each path is translated by the absolute
//! origin of the node that owns it before any endpoint is compared, and the
//! endpoints stored on a [`Link`] are absolute. The returned chains borrow
//! the model's paths and are invalidated by any mutation of the model.

use plotkit_core::{to_absolute, GeometryModel, Path, PathGeometry, Point};
use std::collections::HashMap;
use tracing::debug;

use crate::context::DEFAULT_CHAIN_TOLERANCE;

/// Chain finding options.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChainOptions {
    /// Maximum distance between two endpoints that are considered joined.
    pub endpoint_tolerance: f64,
    /// Only consider the paths owned directly by the given node.
    pub shallow: bool,
    /// Absolute origin of the given node's parent.
    pub base_offset: Point,
}

impl Default for ChainOptions {
    fn default() -> Self {
        Self {
            endpoint_tolerance: DEFAULT_CHAIN_TOLERANCE,
            shallow: false,
            base_offset: Point::ORIGIN,
        }
    }
}

impl ChainOptions {
    pub fn with_tolerance(endpoint_tolerance: f64) -> Self {
        Self {
            endpoint_tolerance,
            ..Self::default()
        }
    }
}

/// One path in a chain, with its traversal direction.
#[derive(Debug, Clone, PartialEq)]
pub struct Link<'a> {
    pub id: &'a str,
    /// The path as stored, in its owner's local frame.
    pub path: &'a Path,
    /// Absolute origin of the node owning the path.
    pub offset: Point,
    /// True when the chain walks the path from its end to its start.
    pub reversed: bool,
    /// Absolute start point in traversal order.
    pub start: Point,
    /// Absolute end point in traversal order.
    pub end: Point,
}

impl Link<'_> {
    /// The path in absolute coordinates, in stored (not traversal) order.
    pub fn absolute_path(&self) -> Path {
        to_absolute(self.offset, self.path)
    }

    /// Absolute polyline of this link in traversal order.
    pub fn points(&self, detail: f64) -> Vec<Point> {
        let mut pts = self.absolute_path().flatten(detail);
        if self.reversed {
            pts.reverse();
        }
        pts
    }

    fn start_tangent(&self) -> Option<Point> {
        if self.reversed {
            self.path.tangent_at(1.0).map(|t| -t)
        } else {
            self.path.tangent_at(0.0)
        }
    }

    fn end_tangent(&self) -> Option<Point> {
        if self.reversed {
            self.path.tangent_at(0.0).map(|t| -t)
        } else {
            self.path.tangent_at(1.0)
        }
    }
}

/// An ordered run of connected links.
#[derive(Debug, Clone, PartialEq)]
pub struct Chain<'a> {
    pub links: Vec<Link<'a>>,
    /// The last link ends where the first one starts.
    pub closed: bool,
}

impl<'a> Chain<'a> {
    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn start_point(&self) -> Option<Point> {
        self.links.first().map(|l| l.start)
    }

    pub fn end_point(&self) -> Option<Point> {
        self.links.last().map(|l| l.end)
    }

    pub fn length(&self) -> f64 {
        self.links.iter().map(|l| l.path.length()).sum()
    }

    /// Absolute polyline through every link, curves flattened at `detail`.
    /// Joints are emitted once; a closed chain does not repeat its first
    /// point.
    pub fn to_polyline(&self, detail: f64) -> Vec<Point> {
        let mut out: Vec<Point> = Vec::new();
        for link in &self.links {
            let pts = link.points(detail);
            let skip = usize::from(!out.is_empty());
            out.extend(pts.into_iter().skip(skip));
        }
        if self.closed && out.len() > 1 {
            out.pop();
        }
        out
    }
}

#[derive(Debug)]
struct Item<'a> {
    id: &'a str,
    path: &'a Path,
    offset: Point,
    start: Point,
    end: Point,
}

impl<'a> Item<'a> {
    fn link(&self, reversed: bool) -> Link<'a> {
        let (start, end) = if reversed {
            (self.end, self.start)
        } else {
            (self.start, self.end)
        };
        Link {
            id: self.id,
            path: self.path,
            offset: self.offset,
            reversed,
            start,
            end,
        }
    }
}

/// Spatial hash of endpoints keyed on tolerance-sized cells.
struct EndpointIndex {
    cell: f64,
    cells: HashMap<(i64, i64), Vec<usize>>,
}

impl EndpointIndex {
    fn new(cell: f64) -> Self {
        Self {
            cell,
            cells: HashMap::new(),
        }
    }

    fn key(&self, p: Point) -> (i64, i64) {
        ((p.x / self.cell).floor() as i64, (p.y / self.cell).floor() as i64)
    }

    fn insert(&mut self, p: Point, item: usize) {
        let key = self.key(p);
        self.cells.entry(key).or_default().push(item);
    }

    /// Items with an endpoint in the 3x3 cell block around `p`, ascending.
    fn near(&self, p: Point) -> Vec<usize> {
        let (kx, ky) = self.key(p);
        let mut found = Vec::new();
        for dx in -1..=1 {
            for dy in -1..=1 {
                if let Some(items) = self.cells.get(&(kx + dx, ky + dy)) {
                    found.extend_from_slice(items);
                }
            }
        }
        found.sort_unstable();
        found.dedup();
        found
    }
}

/// Finds every chain in `model` and its descendants.
pub fn find_chains(model: &GeometryModel, endpoint_tolerance: f64) -> Vec<Chain<'_>> {
    find_chains_with(model, &ChainOptions::with_tolerance(endpoint_tolerance))
}

/// Finds chains in the node at `route` below `root`, with absolute
/// coordinates computed from `root`.
pub fn find_chains_at<'a>(
    root: &'a GeometryModel,
    route: &[String],
    options: &ChainOptions,
) -> Vec<Chain<'a>> {
    let (Some(node), Some(origin)) = (root.descend(route), root.absolute_origin_of(route)) else {
        return Vec::new();
    };
    let options = ChainOptions {
        base_offset: options.base_offset + origin - node.origin,
        ..*options
    };
    find_chains_with(node, &options)
}

pub fn find_chains_with<'a>(model: &'a GeometryModel, options: &ChainOptions) -> Vec<Chain<'a>> {
    let mut items = Vec::new();
    if options.shallow {
        collect_items(model, options.base_offset + model.origin, &mut items);
    } else {
        collect_tree(model, options.base_offset, &mut items);
    }
    let chains = link_items(&items, options.endpoint_tolerance.max(0.0));
    debug!(
        "chains: {} paths -> {} chains ({} closed)",
        items.len(),
        chains.len(),
        chains.iter().filter(|c| c.closed).count()
    );
    chains
}

fn collect_items<'a>(node: &'a GeometryModel, offset: Point, items: &mut Vec<Item<'a>>) {
    for (id, path) in node.paths() {
        let (start, end) = match path.endpoints() {
            Some((s, e)) => (s + offset, e + offset),
            None => {
                let p = path.point_at(0.0) + offset;
                (p, p)
            }
        };
        items.push(Item {
            id,
            path,
            offset,
            start,
            end,
        });
    }
}

fn collect_tree<'a>(node: &'a GeometryModel, base: Point, items: &mut Vec<Item<'a>>) {
    let offset = base + node.origin;
    collect_items(node, offset, items);
    for (_, child) in node.models() {
        collect_tree(child, offset, items);
    }
}

/// True for paths whose endpoints coincide: circles, full arcs, and
/// zero-length lines.
fn is_self_closed(item: &Item<'_>, tolerance: f64) -> bool {
    item.start.distance_to(&item.end) <= tolerance
}

fn score(incoming: Option<Point>, outgoing: Option<Point>) -> f64 {
    match (incoming, outgoing) {
        (Some(a), Some(b)) => -a.dot(&b),
        _ => 2.0,
    }
}

fn link_items<'a>(items: &[Item<'a>], tolerance: f64) -> Vec<Chain<'a>> {
    let mut index = EndpointIndex::new(tolerance.max(1e-9));
    for (i, item) in items.iter().enumerate() {
        if is_self_closed(item, tolerance) {
            continue;
        }
        index.insert(item.start, i);
        index.insert(item.end, i);
    }

    let mut visited = vec![false; items.len()];
    let mut chains = Vec::new();

    for (i, item) in items.iter().enumerate() {
        if visited[i] {
            continue;
        }
        visited[i] = true;

        if is_self_closed(item, tolerance) {
            // a curve that returns to its start is a loop by itself; a
            // zero-length line is an isolated point
            let closed = item.path.is_curved() && item.path.length() > tolerance;
            chains.push(Chain {
                links: vec![item.link(false)],
                closed,
            });
            continue;
        }

        let mut links = vec![item.link(false)];
        let mut closed = false;

        // forward from the chain end
        loop {
            let (first, last) = (&links[0], &links[links.len() - 1]);
            if links.len() > 1 && last.end.distance_to(&first.start) <= tolerance {
                closed = true;
                break;
            }
            let here = last.end;
            let incoming = last.end_tangent();
            let mut best: Option<(f64, usize, bool)> = None;
            for j in index.near(here) {
                if visited[j] {
                    continue;
                }
                let cand = &items[j];
                for reversed in [false, true] {
                    let attach = if reversed { cand.end } else { cand.start };
                    if attach.distance_to(&here) > tolerance {
                        continue;
                    }
                    let s = score(incoming, cand.link(reversed).start_tangent());
                    if best.map_or(true, |(bs, _, _)| s < bs - 1e-9) {
                        best = Some((s, j, reversed));
                    }
                }
            }
            match best {
                Some((_, j, reversed)) => {
                    visited[j] = true;
                    links.push(items[j].link(reversed));
                }
                None => break,
            }
        }

        // then backward from the chain start
        while !closed {
            let first = &links[0];
            let here = first.start;
            let outgoing = first.start_tangent();
            let mut best: Option<(f64, usize, bool)> = None;
            for j in index.near(here) {
                if visited[j] {
                    continue;
                }
                let cand = &items[j];
                for reversed in [false, true] {
                    let attach = if reversed { cand.start } else { cand.end };
                    if attach.distance_to(&here) > tolerance {
                        continue;
                    }
                    let s = score(cand.link(reversed).end_tangent(), outgoing);
                    if best.map_or(true, |(bs, _, _)| s < bs - 1e-9) {
                        best = Some((s, j, reversed));
                    }
                }
            }
            match best {
                Some((_, j, reversed)) => {
                    visited[j] = true;
                    links.insert(0, items[j].link(reversed));
                    let last = &links[links.len() - 1];
                    if last.end.distance_to(&links[0].start) <= tolerance {
                        closed = true;
                    }
                }
                None => break,
            }
        }

        chains.push(Chain { links, closed });
    }
    chains
}
