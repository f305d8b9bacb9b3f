//! Game board representation including hexes, vertices, edges and ports.
//!
//! This module contains:
//! - Resource and terrain types
//! - Board generation on the integer corner lattice
//! - Building and road occupancy
//! - Board validation and query methods
//!
//! Vertices and edges live in arenas indexed by [`VertexId`] and [`EdgeId`]. Ids are
//! handed out in lattice order when the board is generated and never change; all
//! adjacency is resolved once at that point so queries are plain index lookups.

use crate::hex::{HexCoord, LatticePoint};
use crate::rules::ResourceHand;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use uuid::Uuid;

/// Player identifier
pub type PlayerId = Uuid;

/// Resource types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Resource {
    Wood,
    Brick,
    Sheep,
    Wheat,
    Ore,
}

impl Resource {
    /// All resource types
    pub const ALL: [Resource; 5] = [
        Resource::Wood,
        Resource::Brick,
        Resource::Sheep,
        Resource::Wheat,
        Resource::Ore,
    ];
}

/// What a hex produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Terrain {
    /// Produces a resource when its number is rolled
    Resource(Resource),
    /// No production, robber starts here
    Desert,
}

/// Land hexes in spiral order: centre, inner ring, outer ring
pub const LAND_HEXES: [HexCoord; 19] = [
    HexCoord::new(0, 0),
    // Inner ring
    HexCoord::new(0, -1),
    HexCoord::new(1, -1),
    HexCoord::new(1, 0),
    HexCoord::new(0, 1),
    HexCoord::new(-1, 1),
    HexCoord::new(-1, 0),
    // Outer ring
    HexCoord::new(0, -2),
    HexCoord::new(1, -2),
    HexCoord::new(2, -2),
    HexCoord::new(2, -1),
    HexCoord::new(2, 0),
    HexCoord::new(1, 1),
    HexCoord::new(0, 2),
    HexCoord::new(-1, 2),
    HexCoord::new(-2, 2),
    HexCoord::new(-2, 1),
    HexCoord::new(-2, 0),
    HexCoord::new(-1, -1),
];

/// Standard terrain multiset: 4 wood/sheep/wheat, 3 brick/ore, 1 desert
pub const STANDARD_TERRAINS: [Terrain; 19] = [
    Terrain::Resource(Resource::Wood),
    Terrain::Resource(Resource::Wood),
    Terrain::Resource(Resource::Wood),
    Terrain::Resource(Resource::Wood),
    Terrain::Resource(Resource::Sheep),
    Terrain::Resource(Resource::Sheep),
    Terrain::Resource(Resource::Sheep),
    Terrain::Resource(Resource::Sheep),
    Terrain::Resource(Resource::Wheat),
    Terrain::Resource(Resource::Wheat),
    Terrain::Resource(Resource::Wheat),
    Terrain::Resource(Resource::Wheat),
    Terrain::Resource(Resource::Brick),
    Terrain::Resource(Resource::Brick),
    Terrain::Resource(Resource::Brick),
    Terrain::Resource(Resource::Ore),
    Terrain::Resource(Resource::Ore),
    Terrain::Resource(Resource::Ore),
    Terrain::Desert,
];

/// Standard number tokens (no 7, one each of 2 and 12)
pub const STANDARD_NUMBERS: [u8; 18] = [2, 3, 3, 4, 4, 5, 5, 6, 6, 8, 8, 9, 9, 10, 10, 11, 11, 12];

/// Standard port set: 4 generic, one specific per resource
pub const STANDARD_PORTS: [PortKind; 9] = [
    PortKind::Generic,
    PortKind::Generic,
    PortKind::Generic,
    PortKind::Generic,
    PortKind::Specific(Resource::Wood),
    PortKind::Specific(Resource::Brick),
    PortKind::Specific(Resource::Sheep),
    PortKind::Specific(Resource::Wheat),
    PortKind::Specific(Resource::Ore),
];

/// Index of a vertex in the board arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VertexId(pub u8);

/// Index of an edge in the board arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(pub u8);

impl VertexId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl EdgeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

/// A land hex
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hex {
    pub coord: HexCoord,
    pub terrain: Terrain,
    /// Dice number that triggers production, 0 for the desert
    pub number: u8,
    /// Corner vertices in ring order
    pub vertices: [VertexId; 6],
}

impl Hex {
    /// Get the resource this hex produces, if any
    pub fn resource(&self) -> Option<Resource> {
        match self.terrain {
            Terrain::Resource(r) => Some(r),
            Terrain::Desert => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuildingKind {
    Settlement,
    City,
}

/// A settlement or city on a vertex
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Building {
    pub owner: PlayerId,
    pub kind: BuildingKind,
}

impl Building {
    /// Resources produced per matching roll
    pub fn resource_multiplier(&self) -> u32 {
        match self.kind {
            BuildingKind::Settlement => 1,
            BuildingKind::City => 2,
        }
    }
}

/// A road on an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Road {
    pub owner: PlayerId,
}

/// A hex corner where settlements and cities are built
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vertex {
    pub id: VertexId,
    /// Canonical lattice key, rendered as "x,y"
    pub label: String,
    /// Every land hex touching this corner (1 to 3)
    pub hexes: Vec<HexCoord>,
    /// Incident edges
    pub edges: Vec<EdgeId>,
    /// Vertices one edge away
    pub neighbors: Vec<VertexId>,
    pub building: Option<Building>,
}

/// A hex side where roads are built
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub id: EdgeId,
    /// "<v1>-<v2>" over the ordered endpoint labels
    pub label: String,
    /// Endpoints in lattice order
    pub vertices: [VertexId; 2],
    /// Land hexes on either side (1 on the coast, 2 inland)
    pub hexes: Vec<HexCoord>,
    pub road: Option<Road>,
}

impl Edge {
    /// The endpoint opposite `from`
    pub fn other_end(&self, from: VertexId) -> VertexId {
        if self.vertices[0] == from {
            self.vertices[1]
        } else {
            self.vertices[0]
        }
    }
}

/// Port types for maritime trading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PortKind {
    /// 3:1 trade any resource
    Generic,
    /// 2:1 trade for a specific resource
    Specific(Resource),
}

impl PortKind {
    /// The exchange rate for this port
    pub fn ratio(&self) -> u32 {
        match self {
            PortKind::Generic => 3,
            PortKind::Specific(_) => 2,
        }
    }
}

/// A port on a pair of adjacent coastal vertices
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Port {
    pub vertices: [VertexId; 2],
    pub kind: PortKind,
}

/// The inputs of board generation, in the order they are laid out.
///
/// `terrains` follow [`LAND_HEXES`]; `numbers` are handed to non-desert hexes in
/// that same order; `ports` go around the coast starting from the lowest vertex.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardLayout {
    pub terrains: [Terrain; 19],
    pub numbers: [u8; 18],
    pub ports: [PortKind; 9],
}

impl BoardLayout {
    /// The standard multisets, unshuffled
    pub fn standard() -> Self {
        Self {
            terrains: STANDARD_TERRAINS,
            numbers: STANDARD_NUMBERS,
            ports: STANDARD_PORTS,
        }
    }

    /// The standard multisets, each shuffled independently
    pub fn shuffled<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut layout = Self::standard();
        layout.terrains.shuffle(rng);
        layout.numbers.shuffle(rng);
        layout.ports.shuffle(rng);
        layout
    }
}

/// The complete game board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    hexes: Vec<Hex>,
    vertices: Vec<Vertex>,
    edges: Vec<Edge>,
    ports: Vec<Port>,
    robber: HexCoord,
}

impl Board {
    /// Create a randomized standard board
    pub fn standard() -> Self {
        Self::generate(&mut rand::thread_rng())
    }

    /// Create a randomized standard board from the provided RNG
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::from_layout(&BoardLayout::shuffled(rng))
    }

    /// Build the board topology and lay out tiles, numbers and ports.
    ///
    /// A layout without a desert places the robber on the centre hex.
    pub fn from_layout(layout: &BoardLayout) -> Self {
        // Deduplicate corners and sides by exact lattice key
        let mut corner_hexes: BTreeMap<LatticePoint, Vec<HexCoord>> = BTreeMap::new();
        let mut side_hexes: BTreeMap<(LatticePoint, LatticePoint), Vec<HexCoord>> =
            BTreeMap::new();
        for coord in LAND_HEXES {
            for corner in coord.corners() {
                corner_hexes.entry(corner).or_default().push(coord);
            }
            for side in coord.sides() {
                side_hexes.entry(side).or_default().push(coord);
            }
        }

        let vertex_ids: BTreeMap<LatticePoint, VertexId> = corner_hexes
            .keys()
            .enumerate()
            .map(|(i, key)| (*key, VertexId(i as u8)))
            .collect();

        let mut vertices: Vec<Vertex> = corner_hexes
            .into_iter()
            .enumerate()
            .map(|(i, (key, hexes))| Vertex {
                id: VertexId(i as u8),
                label: key.to_string(),
                hexes,
                edges: Vec::new(),
                neighbors: Vec::new(),
                building: None,
            })
            .collect();

        let mut edges = Vec::with_capacity(side_hexes.len());
        for (i, ((a, b), hexes)) in side_hexes.into_iter().enumerate() {
            let id = EdgeId(i as u8);
            let (va, vb) = (vertex_ids[&a], vertex_ids[&b]);
            vertices[va.index()].edges.push(id);
            vertices[va.index()].neighbors.push(vb);
            vertices[vb.index()].edges.push(id);
            vertices[vb.index()].neighbors.push(va);
            edges.push(Edge {
                id,
                label: format!("{}-{}", a, b),
                vertices: [va, vb],
                hexes,
                road: None,
            });
        }

        let mut numbers = layout.numbers.iter().copied();
        let hexes: Vec<Hex> = LAND_HEXES
            .iter()
            .zip(layout.terrains)
            .map(|(coord, terrain)| Hex {
                coord: *coord,
                terrain,
                number: match terrain {
                    Terrain::Desert => 0,
                    Terrain::Resource(_) => numbers.next().unwrap_or(0),
                },
                vertices: coord.corners().map(|corner| vertex_ids[&corner]),
            })
            .collect();

        let robber = hexes
            .iter()
            .find(|hex| hex.terrain == Terrain::Desert)
            .map(|hex| hex.coord)
            .unwrap_or_default();

        let mut board = Self {
            hexes,
            vertices,
            edges,
            ports: Vec::new(),
            robber,
        };
        board.ports = board.place_ports(&layout.ports);
        board
    }

    /// Coastal vertices in ring order, following the sides that touch only one hex
    fn coastline(&self) -> Vec<VertexId> {
        let mut coastal: BTreeMap<VertexId, Vec<VertexId>> = BTreeMap::new();
        for edge in self.edges.iter().filter(|e| e.hexes.len() == 1) {
            let [a, b] = edge.vertices;
            coastal.entry(a).or_default().push(b);
            coastal.entry(b).or_default().push(a);
        }

        let Some(&start) = coastal.keys().next() else {
            return Vec::new();
        };
        let mut ring = vec![start];
        let mut previous = start;
        let mut current = start;
        while ring.len() < coastal.len() {
            let next = coastal[&current]
                .iter()
                .copied()
                .find(|&v| v != previous && !ring.contains(&v));
            match next {
                Some(v) => {
                    ring.push(v);
                    previous = current;
                    current = v;
                }
                None => break,
            }
        }
        ring
    }

    /// Spread the ports evenly around the coastline, two adjacent vertices each
    fn place_ports(&self, kinds: &[PortKind]) -> Vec<Port> {
        let ring = self.coastline();
        let step = (ring.len() / kinds.len().max(1)).max(2);

        kinds
            .iter()
            .enumerate()
            .filter(|(i, _)| i * step + 1 < ring.len())
            .map(|(i, kind)| Port {
                vertices: [ring[i * step], ring[i * step + 1]],
                kind: *kind,
            })
            .collect()
    }

    // ==================== Query Methods ====================

    pub fn hexes(&self) -> &[Hex] {
        &self.hexes
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn ports(&self) -> &[Port] {
        &self.ports
    }

    /// Get the robber's current location
    pub fn robber(&self) -> HexCoord {
        self.robber
    }

    /// Get a hex by coordinate
    pub fn hex(&self, coord: HexCoord) -> Option<&Hex> {
        self.hexes.iter().find(|h| h.coord == coord)
    }

    pub fn vertex(&self, id: VertexId) -> Option<&Vertex> {
        self.vertices.get(id.index())
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id.index())
    }

    /// Look up a vertex by its "x,y" label
    pub fn vertex_by_label(&self, label: &str) -> Option<VertexId> {
        self.vertices.iter().find(|v| v.label == label).map(|v| v.id)
    }

    /// Look up an edge by its "x,y-x,y" label
    pub fn edge_by_label(&self, label: &str) -> Option<EdgeId> {
        self.edges.iter().find(|e| e.label == label).map(|e| e.id)
    }

    /// The edge joining two vertices, if they are adjacent
    pub fn edge_between(&self, a: VertexId, b: VertexId) -> Option<EdgeId> {
        let vertex = self.vertex(a)?;
        vertex
            .edges
            .iter()
            .copied()
            .find(|&e| self.edges[e.index()].other_end(a) == b)
    }

    /// Building on a vertex
    pub fn building(&self, id: VertexId) -> Option<Building> {
        self.vertex(id).and_then(|v| v.building)
    }

    /// Owner of the road on an edge
    pub fn road_owner(&self, id: EdgeId) -> Option<PlayerId> {
        self.edge(id).and_then(|e| e.road).map(|r| r.owner)
    }

    /// Number of settlements and cities a player has on the board
    pub fn building_counts(&self, player: PlayerId) -> (u32, u32) {
        self.vertices
            .iter()
            .filter_map(|v| v.building)
            .filter(|b| b.owner == player)
            .fold((0, 0), |(settlements, cities), b| match b.kind {
                BuildingKind::Settlement => (settlements + 1, cities),
                BuildingKind::City => (settlements, cities + 1),
            })
    }

    /// Number of roads a player has on the board
    pub fn road_count(&self, player: PlayerId) -> u32 {
        self.edges
            .iter()
            .filter(|e| e.road.is_some_and(|r| r.owner == player))
            .count() as u32
    }

    /// Resources of the non-desert hexes touching a vertex
    pub fn resources_at_vertex(&self, id: VertexId) -> Vec<Resource> {
        self.vertex(id)
            .map(|v| {
                v.hexes
                    .iter()
                    .filter_map(|coord| self.hex(*coord))
                    .filter_map(Hex::resource)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Players with a building on any corner of a hex, in vertex order
    pub fn players_adjacent_to_hex(&self, coord: HexCoord) -> Vec<PlayerId> {
        let mut players = Vec::new();
        if let Some(hex) = self.hex(coord) {
            for vertex in hex.vertices {
                if let Some(building) = self.building(vertex) {
                    if !players.contains(&building.owner) {
                        players.push(building.owner);
                    }
                }
            }
        }
        players
    }

    /// Get all ports a player has access to (through their buildings)
    pub fn player_ports(&self, player: PlayerId) -> Vec<PortKind> {
        self.ports
            .iter()
            .filter(|port| {
                port.vertices
                    .iter()
                    .any(|v| self.building(*v).is_some_and(|b| b.owner == player))
            })
            .map(|port| port.kind)
            .collect()
    }

    /// Best bank trade ratio a player has for a resource
    pub fn trade_ratio(&self, player: PlayerId, resource: Resource) -> u32 {
        self.player_ports(player)
            .into_iter()
            .filter(|kind| match kind {
                PortKind::Generic => true,
                PortKind::Specific(r) => *r == resource,
            })
            .map(|kind| kind.ratio())
            .fold(4, u32::min)
    }

    // ==================== Validation Methods ====================

    /// Check if a vertex satisfies the distance rule (no building one edge away)
    pub fn satisfies_distance_rule(&self, id: VertexId) -> bool {
        self.vertex(id).is_some_and(|v| {
            v.neighbors
                .iter()
                .all(|n| self.vertices[n.index()].building.is_none())
        })
    }

    /// Check if a player's road ends at this vertex
    pub fn touches_own_road(&self, id: VertexId, player: PlayerId) -> bool {
        self.vertex(id).is_some_and(|v| {
            v.edges
                .iter()
                .any(|e| self.road_owner(*e) == Some(player))
        })
    }

    /// Check if an edge connects to a player's network.
    ///
    /// An endpoint holding the player's building always connects. A road of theirs
    /// continuing from an endpoint connects only if no opponent building sits there.
    pub fn road_connects(&self, id: EdgeId, player: PlayerId) -> bool {
        let Some(edge) = self.edge(id) else {
            return false;
        };
        edge.vertices.iter().any(|&endpoint| {
            match self.building(endpoint) {
                Some(b) if b.owner == player => return true,
                Some(_) => return false,
                None => {}
            }
            self.vertices[endpoint.index()]
                .edges
                .iter()
                .any(|&e| e != id && self.road_owner(e) == Some(player))
        })
    }

    /// Empty vertices a player could settle on
    pub fn valid_settlement_spots(&self, player: PlayerId, is_setup: bool) -> Vec<VertexId> {
        self.vertices
            .iter()
            .filter(|v| {
                v.building.is_none()
                    && self.satisfies_distance_rule(v.id)
                    && (is_setup || self.touches_own_road(v.id, player))
            })
            .map(|v| v.id)
            .collect()
    }

    /// Empty edges a player could build a road on
    pub fn valid_road_spots(&self, player: PlayerId) -> Vec<EdgeId> {
        self.edges
            .iter()
            .filter(|e| e.road.is_none() && self.road_connects(e.id, player))
            .map(|e| e.id)
            .collect()
    }

    // ==================== Mutation Methods ====================

    /// Place a settlement (assumes validation already done)
    pub fn place_settlement(&mut self, id: VertexId, player: PlayerId) {
        if let Some(vertex) = self.vertices.get_mut(id.index()) {
            vertex.building = Some(Building {
                owner: player,
                kind: BuildingKind::Settlement,
            });
        }
    }

    /// Upgrade a settlement to a city
    pub fn upgrade_to_city(&mut self, id: VertexId) {
        if let Some(building) = self
            .vertices
            .get_mut(id.index())
            .and_then(|v| v.building.as_mut())
        {
            building.kind = BuildingKind::City;
        }
    }

    /// Place a road
    pub fn place_road(&mut self, id: EdgeId, player: PlayerId) {
        if let Some(edge) = self.edges.get_mut(id.index()) {
            edge.road = Some(Road { owner: player });
        }
    }

    /// Move the robber to a new location
    pub fn move_robber(&mut self, coord: HexCoord) {
        self.robber = coord;
    }

    // ==================== Resource Distribution ====================

    /// Resources produced for a dice total, per player
    pub fn production(&self, roll: u8) -> BTreeMap<PlayerId, ResourceHand> {
        let mut distribution: BTreeMap<PlayerId, ResourceHand> = BTreeMap::new();

        for hex in &self.hexes {
            if hex.number != roll || hex.coord == self.robber {
                continue;
            }
            let Some(resource) = hex.resource() else {
                continue;
            };
            for vertex in hex.vertices {
                if let Some(building) = self.building(vertex) {
                    distribution
                        .entry(building.owner)
                        .or_default()
                        .add(resource, building.resource_multiplier());
                }
            }
        }

        distribution
    }

    /// Coastal vertices (touching fewer than 3 hexes)
    pub fn coastal_vertices(&self) -> BTreeSet<VertexId> {
        self.vertices
            .iter()
            .filter(|v| v.hexes.len() < 3)
            .map(|v| v.id)
            .collect()
    }
}
