use super::{BBox, Point3, Vec3};

#[derive(Debug, Clone, Copy)]
struct BvhNode {
    bbox: BBox,
    left: u32,
    right: u32,
    start: u32,
    count: u32,
}

impl BvhNode {
    const fn leaf(bbox: BBox, start: u32, count: u32) -> Self {
        Self {
            bbox,
            left: u32::MAX,
            right: u32::MAX,
            start,
            count,
        }
    }

    const fn inner(bbox: BBox, left: u32, right: u32) -> Self {
        Self {
            bbox,
            left,
            right,
            start: 0,
            count: 0,
        }
    }

    const fn is_leaf(self) -> bool {
        self.count != 0
    }
}

/// Median-split bounding volume hierarchy over primitive bounding boxes.
///
/// Only answers ray queries; primitive tests are left to the caller.
#[derive(Debug, Clone)]
pub(crate) struct Bvh {
    nodes: Vec<BvhNode>,
    prim_indices: Vec<u32>,
}

impl Bvh {
    const DEFAULT_LEAF_SIZE: usize = 8;

    #[must_use]
    pub(crate) fn build(bboxes: &[BBox]) -> Option<Self> {
        Self::build_with_leaf_size(bboxes, Self::DEFAULT_LEAF_SIZE)
    }

    #[must_use]
    pub(crate) fn build_with_leaf_size(bboxes: &[BBox], leaf_size: usize) -> Option<Self> {
        if bboxes.is_empty() {
            return None;
        }

        let leaf_size = leaf_size.clamp(1, 256);
        let prim_indices: Vec<u32> = (0..bboxes.len() as u32).collect();
        let nodes = Vec::with_capacity(bboxes.len().saturating_mul(2));

        let mut bvh = Self { nodes, prim_indices };
        bvh.build_node(bboxes, 0, bboxes.len(), leaf_size);
        Some(bvh)
    }

    fn build_node(&mut self, bboxes: &[BBox], start: usize, end: usize, leaf_size: usize) -> u32 {
        let node_index = self.nodes.len() as u32;
        let bbox = self.range_bbox(bboxes, start, end);
        self.nodes.push(BvhNode::leaf(bbox, 0, 0));

        let count = end - start;
        if count <= leaf_size {
            self.nodes[node_index as usize] = BvhNode::leaf(bbox, start as u32, count as u32);
            return node_index;
        }

        let axis = longest_axis(self.centroid_bounds(bboxes, start, end));
        let mid = start + count / 2;
        self.prim_indices[start..end].select_nth_unstable_by(mid - start, |a, b| {
            let ca = axis_component(bboxes[*a as usize].center(), axis);
            let cb = axis_component(bboxes[*b as usize].center(), axis);
            ca.total_cmp(&cb)
        });

        let left = self.build_node(bboxes, start, mid, leaf_size);
        let right = self.build_node(bboxes, mid, end, leaf_size);
        self.nodes[node_index as usize] = BvhNode::inner(bbox, left, right);
        node_index
    }

    fn range_bbox(&self, bboxes: &[BBox], start: usize, end: usize) -> BBox {
        self.prim_indices[(start + 1)..end]
            .iter()
            .fold(bboxes[self.prim_indices[start] as usize], |acc, &idx| {
                acc.union(bboxes[idx as usize])
            })
    }

    fn centroid_bounds(&self, bboxes: &[BBox], start: usize, end: usize) -> BBox {
        let first = bboxes[self.prim_indices[start] as usize].center();
        self.prim_indices[(start + 1)..end]
            .iter()
            .fold(BBox::new(first, first), |acc, &idx| {
                acc.expand_point(bboxes[idx as usize].center())
            })
    }

    /// Visits every primitive whose node box the ray `origin + t * dir`
    /// crosses for `t` in `[t_min, t_max]`.
    ///
    /// The visitor may return a tighter `t_max` (the parameter of a hit it
    /// just accepted) so later boxes beyond that hit are pruned.
    pub(crate) fn query_ray<F>(&self, origin: Point3, dir: Vec3, t_min: f64, t_max: f64, mut visit: F)
    where
        F: FnMut(usize) -> Option<f64>,
    {
        if self.nodes.is_empty() {
            return;
        }

        let mut t_max = t_max;
        let mut stack = vec![0u32];

        while let Some(node_idx) = stack.pop() {
            let node = self.nodes[node_idx as usize];
            if !ray_intersects_bbox(origin, dir, node.bbox, t_min, t_max) {
                continue;
            }

            if node.is_leaf() {
                let start = node.start as usize;
                let end = start + node.count as usize;
                for &prim in &self.prim_indices[start..end] {
                    if let Some(t) = visit(prim as usize) {
                        t_max = t_max.min(t);
                    }
                }
                continue;
            }

            stack.push(node.right);
            stack.push(node.left);
        }
    }
}

fn longest_axis(bounds: BBox) -> u8 {
    let ex = bounds.max.x - bounds.min.x;
    let ey = bounds.max.y - bounds.min.y;
    let ez = bounds.max.z - bounds.min.z;

    if ex >= ey && ex >= ez {
        0
    } else if ey >= ez {
        1
    } else {
        2
    }
}

fn axis_component(p: Point3, axis: u8) -> f64 {
    match axis {
        0 => p.x,
        1 => p.y,
        _ => p.z,
    }
}

fn ray_intersects_bbox(origin: Point3, dir: Vec3, bbox: BBox, t_min: f64, t_max: f64) -> bool {
    let mut tmin = t_min;
    let mut tmax = t_max;
    let eps = 1e-15;

    for axis in 0..3u8 {
        let (o, d, min, max) = match axis {
            0 => (origin.x, dir.x, bbox.min.x, bbox.max.x),
            1 => (origin.y, dir.y, bbox.min.y, bbox.max.y),
            _ => (origin.z, dir.z, bbox.min.z, bbox.max.z),
        };

        if !o.is_finite() || !d.is_finite() {
            return false;
        }

        if d.abs() <= eps {
            if o < min || o > max {
                return false;
            }
            continue;
        }

        let inv_d = 1.0 / d;
        let mut t0 = (min - o) * inv_d;
        let mut t1 = (max - o) * inv_d;
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }

        tmin = tmin.max(t0);
        tmax = tmax.min(t1);
        if tmax < tmin {
            return false;
        }
    }

    true
}
