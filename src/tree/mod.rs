//! Room tree: an arena of `RoomNode`s addressed by `RoomId`.
//!
//! Children are owned by position in their parent's `children` list; the
//! `parent` field is a plain back-index used for coordinate lookups and
//! cascade checks, never for ownership.

pub mod builder;

use std::collections::{BTreeSet, VecDeque};
use std::ops::Index;

use serde::{Deserialize, Serialize};

use crate::grammar::direction::SpawnDirection;
use crate::grammar::RoomType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoomId(pub usize);

/// Axis-aligned rectangle of grid cells, walls included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Footprint {
    pub x: i32,
    pub y: i32,
    pub z: u32,
    pub width: u32,
    pub height: u32,
}

impl Footprint {
    pub fn right(&self) -> i32 {
        self.x + self.width as i32 - 1
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height as i32 - 1
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x <= self.right() && y >= self.y && y <= self.bottom()
    }

    pub fn cells(&self) -> BTreeSet<(i32, i32)> {
        (self.x..=self.right())
            .flat_map(|x| (self.y..=self.bottom()).map(move |y| (x, y)))
            .collect()
    }

    /// Wall ring of the rectangle.
    pub fn perimeter(&self) -> BTreeSet<(i32, i32)> {
        self.cells()
            .into_iter()
            .filter(|&(x, y)| x == self.x || x == self.right() || y == self.y || y == self.bottom())
            .collect()
    }

    /// Everything inside the wall ring.
    pub fn interior(&self) -> BTreeSet<(i32, i32)> {
        self.cells()
            .into_iter()
            .filter(|&(x, y)| x > self.x && x < self.right() && y > self.y && y < self.bottom())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomNode {
    room_type: RoomType,
    width: u32,
    height: u32,
    pub(crate) x: i32,
    pub(crate) y: i32,
    pub(crate) z: u32,
    pub(crate) spawn_direction: Option<SpawnDirection>,
    pub(crate) placed: bool,
    parent: Option<RoomId>,
    children: Vec<RoomId>,
}

impl RoomNode {
    fn new(room_type: RoomType, width: u32, height: u32, parent: Option<RoomId>) -> Self {
        Self {
            room_type,
            width,
            height,
            x: 0,
            y: 0,
            z: 0,
            spawn_direction: None,
            placed: true,
            parent,
            children: Vec::new(),
        }
    }

    pub fn room_type(&self) -> RoomType {
        self.room_type
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn x(&self) -> i32 {
        self.x
    }

    pub fn y(&self) -> i32 {
        self.y
    }

    pub fn z(&self) -> u32 {
        self.z
    }

    pub fn spawn_direction(&self) -> Option<SpawnDirection> {
        self.spawn_direction
    }

    pub fn placed(&self) -> bool {
        self.placed
    }

    pub fn parent(&self) -> Option<RoomId> {
        self.parent
    }

    pub fn children(&self) -> &[RoomId] {
        &self.children
    }

    pub fn footprint(&self) -> Footprint {
        Footprint {
            x: self.x,
            y: self.y,
            z: self.z,
            width: self.width,
            height: self.height,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomTree {
    nodes: Vec<RoomNode>,
}

impl Index<RoomId> for RoomTree {
    type Output = RoomNode;

    fn index(&self, id: RoomId) -> &RoomNode {
        &self.nodes[id.0]
    }
}

impl RoomTree {
    /// A tree holding only its root room at the origin.
    pub fn new(root_type: RoomType, width: u32, height: u32) -> Self {
        Self {
            nodes: vec![RoomNode::new(root_type, width, height, None)],
        }
    }

    pub fn add_child(
        &mut self,
        parent: RoomId,
        room_type: RoomType,
        width: u32,
        height: u32,
    ) -> RoomId {
        let id = RoomId(self.nodes.len());
        self.nodes
            .push(RoomNode::new(room_type, width, height, Some(parent)));
        self.nodes[parent.0].children.push(id);
        id
    }

    pub fn root(&self) -> RoomId {
        RoomId(0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: RoomId) -> Option<&RoomNode> {
        self.nodes.get(id.0)
    }

    pub(crate) fn node_mut(&mut self, id: RoomId) -> &mut RoomNode {
        &mut self.nodes[id.0]
    }

    pub fn ids(&self) -> impl Iterator<Item = RoomId> {
        (0..self.nodes.len()).map(RoomId)
    }

    pub fn children_of(&self, id: RoomId) -> &[RoomId] {
        &self[id].children
    }

    pub fn parent_of(&self, id: RoomId) -> Option<RoomId> {
        self[id].parent
    }

    pub fn is_placed(&self, id: RoomId) -> bool {
        self[id].placed
    }

    pub fn footprint_of(&self, id: RoomId) -> Footprint {
        self[id].footprint()
    }

    pub fn count_of(&self, room_type: RoomType) -> usize {
        self.nodes
            .iter()
            .filter(|n| n.room_type == room_type)
            .count()
    }

    /// Breadth-first order from the root, children in insertion order.
    pub fn iter_bfs(&self) -> Vec<RoomId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut queue = VecDeque::from([self.root()]);
        while let Some(id) = queue.pop_front() {
            order.push(id);
            queue.extend(self.children_of(id).iter().copied());
        }
        order
    }

    /// Every node below `id`, not including `id` itself.
    pub fn descendants(&self, id: RoomId) -> Vec<RoomId> {
        let mut out = Vec::new();
        let mut stack: Vec<RoomId> = self.children_of(id).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children_of(next).iter().rev().copied());
        }
        out
    }

    /// Set `placed` on `id` and every descendant.
    pub fn set_placed_cascading(&mut self, id: RoomId, placed: bool) {
        self.nodes[id.0].placed = placed;
        for child in self.descendants(id) {
            self.nodes[child.0].placed = placed;
        }
    }

    /// Move every room by the same offset (grid growth at the front).
    pub(crate) fn translate_all(&mut self, dx: i32, dy: i32) {
        for node in &mut self.nodes {
            node.x += dx;
            node.y += dy;
        }
    }
}
