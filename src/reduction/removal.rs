
/*!

The elementary steps of the reduction: removing one link, moving its traffic onto the least-traffic path, restoring links from the ledger, and joining two components after removing a bridge.

Every procedure leaves the graph connected when it returns.

*/

use log::{debug,warn};

use super::{Ledger,ReductionLimits};
use crate::topology::{Edge,TrafficGraph,WeightedEdge};

///What happened to a candidate link.
#[derive(Debug,Clone,Copy,PartialEq,Eq)]
pub enum RemovalResult
{
	///The link was removed and its traffic rerouted.
	Removed,
	///The link was a bridge. It was removed and the two sides were joined by two new links.
	Reconnected,
	///Removing the link would disconnect the graph, so it was put back.
	Restored,
	///The link was not in the graph anymore.
	Absent,
}

///Restores links from the ledger while there is room below `max_links`.
///Candidates are tried heaviest first. A candidate is added back with weight zero when both of its switches have degree below `max_degree`; otherwise it returns to the ledger.
///Returns the number of restored links.
pub fn reinsert_edges(graph:&mut TrafficGraph, ledger:&mut Ledger, limits:&ReductionLimits) -> usize
{
	if graph.num_links()>=limits.max_links || ledger.is_empty()
	{
		return 0;
	}
	ledger.sort_descending();
	let mut restored = 0;
	let mut iterations = 0;
	let mut consecutive_rejections = 0;
	while graph.num_links()<limits.max_links && iterations<limits.iteration_bound()
	{
		iterations += 1;
		let entry = match ledger.pop()
		{
			Some(entry) => entry,
			None => break,
		};
		let edge = entry.edge;
		if !graph.contains_edge(edge) && graph.degree(edge.first)<limits.max_degree && graph.degree(edge.second)<limits.max_degree
		{
			debug!("restoring link {}-{} (carried {} bytes when removed)",edge.first,edge.second,entry.weight);
			graph.add_edge(edge,0);
			restored += 1;
			consecutive_rejections = 0;
		}
		else
		{
			ledger.put_back(entry);
			consecutive_rejections += 1;
			//Degrees do not change while rejecting, so a whole round of rejections is final.
			if consecutive_rejections>=ledger.len()
			{
				break;
			}
		}
	}
	restored
}

///Moves the traffic of a removed link onto the least-traffic path between its switches.
///Before that, links from the ledger may be restored, and then the removed link is recorded in the ledger.
pub fn reroute_traffic(graph:&mut TrafficGraph, ledger:&mut Ledger, limits:&ReductionLimits, removed:WeightedEdge)
{
	reinsert_edges(graph,ledger,limits);
	ledger.push(removed);
	let Edge{first,second} = removed.edge;
	let path = graph.shortest_path(first,second).expect("rerouting over a disconnected graph");
	debug!("rerouting {} bytes of {}-{} over {:?}",removed.weight,first,second,path);
	for hop in path.windows(2)
	{
		graph.add_edge(Edge::new(hop[0],hop[1]),removed.weight);
	}
}

///Removes the link if the graph stays connected without it. Otherwise it is put back untouched.
pub fn remove_edge_first_pass(graph:&mut TrafficGraph, ledger:&mut Ledger, limits:&ReductionLimits, edge:Edge) -> RemovalResult
{
	let weight = match graph.remove_edge(edge)
	{
		Some(weight) => weight,
		None => return RemovalResult::Absent,
	};
	if graph.is_connected()
	{
		debug!("removed link {}-{} with {} bytes",edge.first,edge.second,weight);
		reroute_traffic(graph,ledger,limits,WeightedEdge{edge,weight});
		RemovalResult::Removed
	}
	else
	{
		graph.add_edge(edge,weight);
		RemovalResult::Restored
	}
}

///Removes the link even if it is a bridge. In that case the two resulting components are joined again by `reconnect_components`.
///A bridge towards a single switch is never removed, since that switch would have nothing to offer to the reconnection.
pub fn remove_edge_second_pass(graph:&mut TrafficGraph, ledger:&mut Ledger, limits:&ReductionLimits, edge:Edge) -> RemovalResult
{
	let weight = match graph.remove_edge(edge)
	{
		Some(weight) => weight,
		None => return RemovalResult::Absent,
	};
	let removed = WeightedEdge{edge,weight};
	if graph.is_connected()
	{
		debug!("removed link {}-{} with {} bytes",edge.first,edge.second,weight);
		reroute_traffic(graph,ledger,limits,removed);
		return RemovalResult::Removed;
	}
	let components = graph.components();
	assert_eq!(components.len(),2,"removing the single link {}-{} from a connected graph gave {} components",edge.first,edge.second,components.len());
	if components.iter().any(|component|component.len()==1)
	{
		graph.add_edge(edge,weight);
		return RemovalResult::Restored;
	}
	if reconnect_components(graph,ledger,limits,&components)
	{
		debug!("removed bridge {}-{} with {} bytes",edge.first,edge.second,weight);
		reroute_traffic(graph,ledger,limits,removed);
		RemovalResult::Reconnected
	}
	else
	{
		graph.add_edge(edge,weight);
		RemovalResult::Restored
	}
}

///Joins two components. The lightest link of each component is removed and their endpoints are linked crosswise: first with first and second with second.
///The new links start with weight zero and then receive the traffic of the two removed ones.
///If the result is still disconnected everything is undone and `false` is returned.
pub fn reconnect_components(graph:&mut TrafficGraph, ledger:&mut Ledger, limits:&ReductionLimits, components:&[Vec<usize>]) -> bool
{
	assert_eq!(components.len(),2,"only two components can be reconnected");
	let lightest:Vec<Edge> = components.iter().map(|component|{
		graph.subgraph(component).edges_sorted_by_weight().first().map(|e|e.edge).expect("a component of several switches without links")
	}).collect();
	let (a,b) = (lightest[0],lightest[1]);
	let weight_a = graph.remove_edge(a).expect("lightest link vanished");
	let weight_b = graph.remove_edge(b).expect("lightest link vanished");
	let cross_first = Edge::new(a.first,b.first);
	let cross_second = Edge::new(a.second,b.second);
	graph.add_edge(cross_first,0);
	graph.add_edge(cross_second,0);
	if !graph.is_connected()
	{
		warn!("joining through {}-{} and {}-{} leaves the network split; keeping the bridge",cross_first.first,cross_first.second,cross_second.first,cross_second.second);
		graph.remove_edge(cross_first);
		graph.remove_edge(cross_second);
		graph.add_edge(a,weight_a);
		graph.add_edge(b,weight_b);
		return false;
	}
	debug!("components joined by {}-{} and {}-{}",cross_first.first,cross_first.second,cross_second.first,cross_second.second);
	reroute_traffic(graph,ledger,limits,WeightedEdge{edge:a,weight:weight_a});
	reroute_traffic(graph,ledger,limits,WeightedEdge{edge:b,weight:weight_b});
	true
}
