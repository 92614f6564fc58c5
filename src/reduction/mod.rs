
/*!

Reduction of a traffic graph until it meets a bound on the number of links and a bound on the degree of each switch, keeping it connected.

The reduction runs in three stages:
1. Lightest links are removed while the graph stays connected ([`remove_edge_first_pass`]). Their traffic is added along the least-traffic path between their switches.
2. If there are still too many links, bridges are also removed and the two sides joined again by new links ([`remove_edge_second_pass`]).
3. For each switch of excessive degree its links are removed with both procedures, first those towards neighbours that also exceed the degree bound. Removed links may be restored from the [`Ledger`] when the link budget allows it.

The bounds are targets: the result tells whether they were met in [`ReductionOutcome`].

*/

pub mod ledger;
pub mod removal;

use log::{debug,info};

use crate::topology::{rank_edges,Edge,Ranking,TrafficGraph,WeightedEdge};
pub use self::ledger::Ledger;
pub use self::removal::{reinsert_edges,reroute_traffic,remove_edge_first_pass,remove_edge_second_pass,reconnect_components,RemovalResult};

///The targets of the reduction.
#[derive(Debug,Clone,Copy,PartialEq,Eq)]
pub struct ReductionLimits
{
	pub max_links: usize,
	pub max_degree: usize,
}

impl ReductionLimits
{
	///Bound on the iterations of a single reinsertion step.
	pub fn iteration_bound(&self) -> usize
	{
		self.max_links*100
	}
}

///Whether the targets were reached.
#[derive(Debug,Clone,Copy,PartialEq,Eq)]
pub struct ReductionOutcome
{
	pub links: usize,
	pub maximum_degree: usize,
	pub links_met: bool,
	pub degree_met: bool,
}

impl ReductionOutcome
{
	pub fn evaluate(graph:&TrafficGraph, limits:&ReductionLimits) -> ReductionOutcome
	{
		let links = graph.num_links();
		let maximum_degree = graph.maximum_degree();
		ReductionOutcome{
			links,
			maximum_degree,
			links_met: links<=limits.max_links,
			degree_met: maximum_degree<=limits.max_degree,
		}
	}
	pub fn is_feasible(&self) -> bool
	{
		self.links_met && self.degree_met
	}
}

///The reduced graph together with the links that were removed on the way.
#[derive(Debug)]
pub struct Reduction
{
	pub graph: TrafficGraph,
	pub ledger: Ledger,
	pub outcome: ReductionOutcome,
}

type RemovalProcedure = fn(&mut TrafficGraph,&mut Ledger,&ReductionLimits,Edge) -> RemovalResult;

///Runs the whole reduction. The graph must be connected.
pub fn reduce(mut graph:TrafficGraph, limits:ReductionLimits) -> Reduction
{
	let mut ledger = Ledger::new();
	reduce_links(&mut graph,&mut ledger,&limits);
	reduce_degrees(&mut graph,&mut ledger,&limits);
	let outcome = ReductionOutcome::evaluate(&graph,&limits);
	info!("reduction finished with {} links and maximum degree {}",outcome.links,outcome.maximum_degree);
	Reduction{graph,ledger,outcome}
}

///Removes links in increasing order of traffic until there are at most `max_links`.
///The second pass is only entered if the first one was not enough.
pub fn reduce_links(graph:&mut TrafficGraph, ledger:&mut Ledger, limits:&ReductionLimits)
{
	let passes:[(&str,RemovalProcedure);2] = [
		("first",remove_edge_first_pass as RemovalProcedure),
		("second",remove_edge_second_pass as RemovalProcedure),
	];
	for (name,procedure) in passes.iter()
	{
		if graph.num_links()<=limits.max_links
		{
			break;
		}
		info!("{} pass over {} links (target {})",name,graph.num_links(),limits.max_links);
		for candidate in graph.edges_sorted_by_weight()
		{
			if graph.num_links()<=limits.max_links
			{
				break;
			}
			procedure(graph,ledger,limits,candidate.edge);
		}
	}
}

///Splits the links of `node` by the degree of the neighbour at the other end: those over `max_degree` (heavy) and the rest (light). Both lists are sorted by increasing weight.
pub fn edges_by_neighbour_class(graph:&TrafficGraph, node:usize, max_degree:usize) -> (Vec<WeightedEdge>,Vec<WeightedEdge>)
{
	let (mut heavy,mut light):(Vec<WeightedEdge>,Vec<WeightedEdge>) = graph.neighbours(node)
		.map(|(neighbour,weight)|(graph.degree(neighbour),WeightedEdge{edge:Edge::new(node,neighbour),weight}))
		.fold((vec![],vec![]),|(mut heavy,mut light),(degree,edge)|{
			if degree>max_degree { heavy.push(edge) } else { light.push(edge) }
			(heavy,light)
		});
	rank_edges(&mut heavy,Ranking::Ascending);
	rank_edges(&mut light,Ranking::Ascending);
	(heavy,light)
}

///Lowers the degree of every switch over `max_degree`, removing first the links towards other overloaded switches and the lightest ones.
pub fn reduce_degrees(graph:&mut TrafficGraph, ledger:&mut Ledger, limits:&ReductionLimits)
{
	let procedures:[RemovalProcedure;2] = [remove_edge_first_pass as RemovalProcedure,remove_edge_second_pass];
	let nodes:Vec<usize> = graph.nodes().collect();
	for node in nodes
	{
		if graph.degree(node)<=limits.max_degree
		{
			continue;
		}
		debug!("switch {} has degree {} over {}",node,graph.degree(node),limits.max_degree);
		for procedure in procedures.iter()
		{
			let (heavy,light) = edges_by_neighbour_class(graph,node,limits.max_degree);
			for candidate in heavy.iter().chain(light.iter())
			{
				if graph.degree(node)<=limits.max_degree
				{
					break;
				}
				procedure(graph,ledger,limits,candidate.edge);
			}
		}
	}
}
