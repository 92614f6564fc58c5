
/*!

A topology here is the set of switch-to-switch links of the on-chip network.

[`TrafficGraph`] is the undirected weighted graph under reduction. Each node is a switch and each edge a bidirectional link, weighted by the bytes transferred through it. See [`cartesian`] for the standard topologies used as references.

*/

pub mod cartesian;

use std::cmp::Reverse;
use std::collections::{BTreeMap,BinaryHeap,VecDeque};

use itertools::Itertools;

use crate::matrix::Matrix;

///Bytes transferred through a link.
pub type Weight = u64;

///An unordered pair of distinct switches. It is always stored with `first<second`.
#[derive(Clone,Copy,Debug,Hash,PartialEq,Eq,PartialOrd,Ord)]
pub struct Edge
{
	pub first: usize,
	pub second: usize,
}

impl Edge
{
	pub fn new(a:usize, b:usize) -> Edge
	{
		assert!(a!=b,"self-loop at switch {}",a);
		if a<b { Edge{first:a,second:b} } else { Edge{first:b,second:a} }
	}
	pub fn contains(&self, node:usize) -> bool
	{
		self.first==node || self.second==node
	}
}

///An edge together with the traffic it carries (or carried, when it is in the ledger).
#[derive(Clone,Copy,Debug,PartialEq,Eq)]
pub struct WeightedEdge
{
	pub edge: Edge,
	pub weight: Weight,
}

#[derive(Clone,Copy,Debug,PartialEq,Eq)]
pub enum Ranking
{
	///Lightest first. Used to select links to remove.
	Ascending,
	///Heaviest first. Used to select links to restore.
	Descending,
}

///Stable sort of the edges by weight. Ties keep their relative order.
pub fn rank_edges(edges:&mut [WeightedEdge], ranking:Ranking)
{
	match ranking
	{
		Ranking::Ascending => edges.sort_by_key(|e|e.weight),
		Ranking::Descending => edges.sort_by_key(|e|Reverse(e.weight)),
	}
}

///Undirected graph of switches weighted by traffic.
///There is at most one edge between any pair of switches; adding a parallel edge adds its weight to the existing one.
#[derive(Clone,Debug,Default,PartialEq,Eq)]
pub struct TrafficGraph
{
	adjacency: BTreeMap<usize,BTreeMap<usize,Weight>>,
}

///Some figures of merit of a topology.
#[derive(Clone,Debug,PartialEq)]
pub struct TopologyMetrics
{
	pub switches: usize,
	pub links: usize,
	pub maximum_degree: usize,
	///The greatest number of hops between two switches. `None` if disconnected.
	pub diameter: Option<usize>,
	///Average hops over ordered pairs of distinct switches. `None` if disconnected.
	pub average_distance: Option<f64>,
}

impl TrafficGraph
{
	pub fn new() -> TrafficGraph
	{
		TrafficGraph::default()
	}
	///Builds a graph with zero weights from a list of links.
	pub fn from_links<I:IntoIterator<Item=(usize,usize)>>(links:I) -> TrafficGraph
	{
		let mut graph = TrafficGraph::new();
		for (a,b) in links
		{
			graph.add_edge(Edge::new(a,b),0);
		}
		graph
	}
	pub fn add_node(&mut self, node:usize)
	{
		self.adjacency.entry(node).or_default();
	}
	///Adds `weight` to the edge, creating it when missing. Returns the resulting weight.
	pub fn add_edge(&mut self, edge:Edge, weight:Weight) -> Weight
	{
		let w = self.adjacency.entry(edge.first).or_default().entry(edge.second).or_insert(0);
		*w += weight;
		let total = *w;
		self.adjacency.entry(edge.second).or_default().insert(edge.first,total);
		total
	}
	///Removes the edge, returning the weight it had. The endpoints remain in the graph.
	pub fn remove_edge(&mut self, edge:Edge) -> Option<Weight>
	{
		let weight = self.adjacency.get_mut(&edge.first)?.remove(&edge.second)?;
		if let Some(neighbours) = self.adjacency.get_mut(&edge.second)
		{
			neighbours.remove(&edge.first);
		}
		Some(weight)
	}
	pub fn weight(&self, edge:Edge) -> Option<Weight>
	{
		self.adjacency.get(&edge.first)?.get(&edge.second).copied()
	}
	pub fn contains_edge(&self, edge:Edge) -> bool
	{
		self.weight(edge).is_some()
	}
	pub fn contains_node(&self, node:usize) -> bool
	{
		self.adjacency.contains_key(&node)
	}
	///The switches in increasing order.
	pub fn nodes(&self) -> impl Iterator<Item=usize> + '_
	{
		self.adjacency.keys().copied()
	}
	pub fn num_nodes(&self) -> usize
	{
		self.adjacency.len()
	}
	pub fn num_links(&self) -> usize
	{
		self.adjacency.values().map(|n|n.len()).sum::<usize>()/2
	}
	pub fn degree(&self, node:usize) -> usize
	{
		self.adjacency.get(&node).map(|n|n.len()).unwrap_or(0)
	}
	pub fn maximum_degree(&self) -> usize
	{
		self.adjacency.values().map(|n|n.len()).max().unwrap_or(0)
	}
	///Neighbour switches and the weight of the link towards them.
	pub fn neighbours(&self, node:usize) -> impl Iterator<Item=(usize,Weight)> + '_
	{
		self.adjacency.get(&node).into_iter().flat_map(|n|n.iter().map(|(&neighbour,&weight)|(neighbour,weight)))
	}
	///All the edges, ordered by `(first,second)`.
	pub fn edges(&self) -> Vec<WeightedEdge>
	{
		self.adjacency.iter().flat_map(|(&a,neighbours)|
			neighbours.range(a+1..).map(move |(&b,&weight)|WeightedEdge{edge:Edge{first:a,second:b},weight})
		).collect()
	}
	///The edges from lightest to heaviest.
	pub fn edges_sorted_by_weight(&self) -> Vec<WeightedEdge>
	{
		let mut edges = self.edges();
		rank_edges(&mut edges,Ranking::Ascending);
		edges
	}
	pub fn total_weight(&self) -> Weight
	{
		self.edges().iter().map(|e|e.weight).sum()
	}
	///The graph induced by the given switches.
	pub fn subgraph(&self, nodes:&[usize]) -> TrafficGraph
	{
		let mut graph = TrafficGraph::new();
		for &node in nodes
		{
			graph.add_node(node);
		}
		for &node in nodes
		{
			for (neighbour,weight) in self.neighbours(node)
			{
				if node<neighbour && graph.contains_node(neighbour)
				{
					graph.add_edge(Edge::new(node,neighbour),weight);
				}
			}
		}
		graph
	}

	///Breadth First Search to compute hop distances from a switch to every switch reachable from it.
	pub fn bfs(&self, origin:usize) -> BTreeMap<usize,usize>
	{
		let mut distance = BTreeMap::new();
		if !self.contains_node(origin)
		{
			return distance;
		}
		distance.insert(origin,0);
		let mut queue = VecDeque::from(vec![origin]);
		while let Some(current) = queue.pop_front()
		{
			let alt = distance[&current]+1;
			for (neighbour,_) in self.neighbours(current)
			{
				if !distance.contains_key(&neighbour)
				{
					distance.insert(neighbour,alt);
					queue.push_back(neighbour);
				}
			}
		}
		distance
	}

	///The connected components, each one sorted, ordered by their least switch.
	pub fn components(&self) -> Vec<Vec<usize>>
	{
		let mut r:Vec<Vec<usize>> = vec![];
		let mut found = BTreeMap::new();
		for node in self.nodes()
		{
			if !found.contains_key(&node)
			{
				let component:Vec<usize> = self.bfs(node).into_keys().collect();
				for &member in component.iter()
				{
					found.insert(member,r.len());
				}
				r.push(component);
			}
		}
		r
	}

	///Whether every switch can reach every other. The empty graph is not connected.
	pub fn is_connected(&self) -> bool
	{
		match self.nodes().next()
		{
			None => false,
			Some(node) => self.bfs(node).len()==self.num_nodes(),
		}
	}

	///Least-traffic path from `origin` to `destination`, using the current weights as lengths (Dijkstra).
	///Returns the sequence of switches including both ends, or `None` if unreachable.
	pub fn shortest_path(&self, origin:usize, destination:usize) -> Option<Vec<usize>>
	{
		if !self.contains_node(origin) || !self.contains_node(destination)
		{
			return None;
		}
		let mut distance:BTreeMap<usize,Weight> = BTreeMap::new();
		let mut previous:BTreeMap<usize,usize> = BTreeMap::new();
		let mut heap = BinaryHeap::new();
		distance.insert(origin,0);
		heap.push(Reverse((0,origin)));
		while let Some(Reverse((best_distance,best))) = heap.pop()
		{
			if best==destination
			{
				break;
			}
			if best_distance > distance[&best]
			{
				continue;//stale entry
			}
			for (neighbour,weight) in self.neighbours(best)
			{
				let alt = best_distance + weight;
				let improves = match distance.get(&neighbour)
				{
					None => true,
					Some(&current) => alt<current,
				};
				if improves
				{
					distance.insert(neighbour,alt);
					previous.insert(neighbour,best);
					heap.push(Reverse((alt,neighbour)));
				}
			}
		}
		if !distance.contains_key(&destination)
		{
			return None;
		}
		let mut path = vec![destination];
		let mut current = destination;
		while current!=origin
		{
			current = previous[&current];
			path.push(current);
		}
		path.reverse();
		Some(path)
	}

	///Hop distances between every pair of switches. Rows and columns follow the order of `nodes()`.
	///Unreachable pairs get `usize::MAX`.
	pub fn compute_distance_matrix(&self) -> Matrix<usize>
	{
		let nodes:Vec<usize> = self.nodes().collect();
		let n = nodes.len();
		let mut matrix = Matrix::constant(<usize>::MAX,n,n);
		for (i,&origin) in nodes.iter().enumerate()
		{
			let d = self.bfs(origin);
			for (j,destination) in nodes.iter().enumerate()
			{
				if let Some(&hops) = d.get(destination)
				{
					*matrix.get_mut(i,j) = hops;
				}
			}
		}
		matrix
	}

	pub fn metrics(&self) -> TopologyMetrics
	{
		let matrix = self.compute_distance_matrix();
		let pairs = matrix.outside_diagonal().count();
		let connected = matrix.outside_diagonal().all(|&d|d!=<usize>::MAX);
		let (diameter,average_distance) = if connected && pairs>0
		{
			let diameter = matrix.outside_diagonal().copied().max();
			let total:usize = matrix.outside_diagonal().sum();
			(diameter,Some(total as f64/pairs as f64))
		} else if connected {
			(Some(0),Some(0.0))
		} else {
			(None,None)
		};
		TopologyMetrics{
			switches: self.num_nodes(),
			links: self.num_links(),
			maximum_degree: self.maximum_degree(),
			diameter,
			average_distance,
		}
	}

	///The links as plain pairs, ordered.
	pub fn links(&self) -> Vec<(usize,usize)>
	{
		self.edges().iter().map(|e|(e.edge.first,e.edge.second)).sorted().collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn square_with_diagonal() -> TrafficGraph
	{
		let mut graph = TrafficGraph::new();
		graph.add_edge(Edge::new(0,1),5);
		graph.add_edge(Edge::new(1,2),1);
		graph.add_edge(Edge::new(2,3),1);
		graph.add_edge(Edge::new(3,0),1);
		graph.add_edge(Edge::new(0,2),9);
		graph
	}

	#[test]
	fn parallel_edges_are_merged()
	{
		let mut graph = TrafficGraph::new();
		graph.add_edge(Edge::new(3,1),10);
		graph.add_edge(Edge::new(1,3),7);
		assert_eq!(graph.num_links(),1);
		assert_eq!(graph.weight(Edge::new(1,3)),Some(17));
		assert_eq!(graph.degree(1),1);
		assert_eq!(graph.degree(3),1);
	}

	#[test]
	#[should_panic]
	fn no_self_loops()
	{
		Edge::new(4,4);
	}

	#[test]
	fn remove_keeps_nodes()
	{
		let mut graph = square_with_diagonal();
		assert_eq!(graph.remove_edge(Edge::new(2,0)),Some(9));
		assert_eq!(graph.remove_edge(Edge::new(2,0)),None);
		assert_eq!(graph.num_nodes(),4);
		assert_eq!(graph.num_links(),4);
		assert_eq!(graph.degree(0),2);
	}

	#[test]
	fn ranking_is_stable()
	{
		let graph = square_with_diagonal();
		let ascending:Vec<Edge> = graph.edges_sorted_by_weight().iter().map(|e|e.edge).collect();
		assert_eq!(ascending,vec![Edge::new(0,3),Edge::new(1,2),Edge::new(2,3),Edge::new(0,1),Edge::new(0,2)]);
		let mut descending = graph.edges();
		rank_edges(&mut descending,Ranking::Descending);
		assert_eq!(descending[0].edge,Edge::new(0,2));
		assert_eq!(descending[1].edge,Edge::new(0,1));
		assert_eq!(descending[2].edge,Edge::new(0,3));
	}

	#[test]
	fn shortest_path_uses_traffic_not_hops()
	{
		let graph = square_with_diagonal();
		//Direct link costs 5, going around costs 3.
		assert_eq!(graph.shortest_path(0,1),Some(vec![0,3,2,1]));
		assert_eq!(graph.shortest_path(2,2),Some(vec![2]));
		let mut split = graph.clone();
		split.add_node(7);
		assert_eq!(split.shortest_path(0,7),None);
	}

	#[test]
	fn connectivity_and_components()
	{
		let mut graph = square_with_diagonal();
		assert!(graph.is_connected());
		graph.remove_edge(Edge::new(0,1));
		graph.remove_edge(Edge::new(2,3));
		assert!(graph.is_connected());
		graph.remove_edge(Edge::new(1,2));
		assert!(!graph.is_connected());
		assert_eq!(graph.components(),vec![vec![0,2,3],vec![1]]);
		assert!(!TrafficGraph::new().is_connected());
	}

	#[test]
	fn induced_subgraph()
	{
		let graph = square_with_diagonal();
		let sub = graph.subgraph(&[0,1,2]);
		assert_eq!(sub.num_nodes(),3);
		assert_eq!(sub.links(),vec![(0,1),(0,2),(1,2)]);
		assert_eq!(sub.weight(Edge::new(0,2)),Some(9));
	}

	#[test]
	fn ring_metrics()
	{
		let ring = TrafficGraph::from_links(vec![(0,1),(1,2),(2,3),(3,4),(4,5),(5,0)]);
		let metrics = ring.metrics();
		assert_eq!(metrics.links,6);
		assert_eq!(metrics.maximum_degree,2);
		assert_eq!(metrics.diameter,Some(3));
		//From any switch: 1,1,2,2,3.
		assert_eq!(metrics.average_distance,Some(9.0/5.0));
		let mut broken = ring.clone();
		broken.add_node(9);
		assert_eq!(broken.metrics().diameter,None);
	}
}
