/*!
Tests of the whole reduction over small and random traffic graphs.
*/

mod common;
use nocsynth::*;
use nocsynth::reduction::{remove_edge_second_pass,Ledger,RemovalResult};
use common::*;

fn limits(max_links:usize, max_degree:usize) -> ReductionLimits
{
    ReductionLimits{max_links,max_degree}
}

#[test]
fn complete_graph_of_four()
{
    let graph = weighted_graph(&[(0,1,1),(0,2,2),(0,3,3),(1,2,4),(1,3,5),(2,3,6)]);
    let reduction = synthesize(&graph,limits(3,3)).expect("connected input");
    //0-1 goes over 0-2-1, then 0-2 over 0-3-2; 0-3 is a bridge and stays; 1-2 goes over 1-3-2.
    assert_eq!(reduction.graph.links(),vec![(0,3),(1,3),(2,3)]);
    assert_eq!(reduction.graph.weight(Edge::new(0,3)),Some(6));
    assert_eq!(reduction.graph.weight(Edge::new(1,3)),Some(10));
    assert_eq!(reduction.graph.weight(Edge::new(2,3)),Some(14));
    assert!(reduction.graph.is_connected());
    assert!(reduction.outcome.is_feasible());
    assert_eq!(reduction.ledger.len(),3);
    assert!(reduction.graph.total_weight()>=graph.total_weight());
}

#[test]
fn path_already_within_bounds()
{
    let graph = weighted_graph(&[(0,1,10),(1,2,10),(2,3,10),(3,4,10)]);
    let reduction = synthesize(&graph,limits(3,2)).expect("connected input");
    //Every link is a bridge to a single switch or joins two paths that cannot be rewired, so nothing changes.
    assert_eq!(reduction.graph,graph);
    assert!(reduction.ledger.is_empty());
    assert!(reduction.outcome.degree_met);
    //Five switches need four links.
    assert!(!reduction.outcome.links_met);
    assert!(!reduction.outcome.is_feasible());
    let relaxed = synthesize(&graph,limits(4,2)).expect("connected input");
    assert_eq!(relaxed.graph,graph);
    assert!(relaxed.outcome.is_feasible());
}

#[test]
fn star_cannot_lose_degree()
{
    let graph = weighted_graph(&[(0,1,3),(0,2,1),(0,3,4),(0,4,1),(0,5,5),(0,6,9)]);
    let reduction = synthesize(&graph,limits(9,4)).expect("connected input");
    assert_eq!(reduction.graph,graph);
    assert_eq!(reduction.outcome.maximum_degree,6);
    assert!(reduction.outcome.links_met);
    assert!(!reduction.outcome.degree_met);
}

#[test]
fn bridge_is_rewired_not_dropped()
{
    let mut graph = weighted_graph(&[(0,1,5),(0,2,7),(1,2,9),(3,4,6),(3,5,8),(4,5,10),(2,3,1)]);
    let before = graph.total_weight();
    let mut ledger = Ledger::new();
    let result = remove_edge_second_pass(&mut graph,&mut ledger,&limits(6,4),Edge::new(2,3));
    assert_eq!(result,RemovalResult::Reconnected);
    assert!(graph.is_connected());
    assert!(!graph.contains_edge(Edge::new(2,3)));
    //The lightest link of each side, 0-1 and 3-4, is replaced by the crosswise 0-3 and 1-4.
    assert!(!graph.contains_edge(Edge::new(0,1)));
    assert!(!graph.contains_edge(Edge::new(3,4)));
    assert!(graph.contains_edge(Edge::new(0,3)));
    assert!(graph.contains_edge(Edge::new(1,4)));
    assert_eq!(graph.num_links(),6);
    assert_eq!(ledger.len(),3);
    assert!(graph.total_weight()>=before);
}

#[test]
fn bridges_in_full_reduction()
{
    //Two complete graphs of four switches joined by a light bridge. Eight links cannot be reached without touching the bridge.
    let mut links = vec![];
    for &(offset,weight) in [(0,100),(4,200)].iter()
    {
        for a in 0..4
        {
            for b in (a+1)..4
            {
                links.push((offset+a,offset+b,weight+(a*4+b) as u64));
            }
        }
    }
    links.push((3,4,1));
    let graph = weighted_graph(&links);
    let reduction = synthesize(&graph,limits(8,4)).expect("connected input");
    assert!(reduction.graph.is_connected());
    assert_eq!(reduction.graph.num_nodes(),8);
    assert_eq!(reduction.outcome.links_met,reduction.graph.num_links()<=8);
    assert!(reduction.graph.total_weight()>=graph.total_weight());
}

#[test]
fn random_complete_graphs_stay_connected()
{
    for seed in 0..24
    {
        let mut rng = seeded(seed);
        let graph = random_complete_graph(9,&mut rng);
        let max_links = 9+(seed as usize)%6;
        let reduction = synthesize(&graph,limits(max_links,4)).expect("connected input");
        assert!(reduction.graph.is_connected(),"seed {}",seed);
        assert_eq!(reduction.graph.num_nodes(),9,"seed {}",seed);
        assert_eq!(reduction.outcome,ReductionOutcome::evaluate(&reduction.graph,&limits(max_links,4)),"seed {}",seed);
        if reduction.outcome.links_met
        {
            assert!(reduction.graph.num_links()<=max_links,"seed {}",seed);
        }
        if reduction.outcome.degree_met
        {
            assert!(reduction.graph.nodes().all(|node|reduction.graph.degree(node)<=4),"seed {}",seed);
        }
        assert!(reduction.graph.total_weight()>=graph.total_weight(),"seed {}",seed);
    }
}

#[test]
fn random_sparse_graphs_stay_connected()
{
    for seed in 100..130
    {
        let mut rng = seeded(seed);
        let graph = random_connected_graph(12,14,&mut rng);
        let reduction = synthesize(&graph,limits(13,4)).expect("connected input");
        assert!(reduction.graph.is_connected(),"seed {}",seed);
        assert!(reduction.graph.total_weight()>=graph.total_weight(),"seed {}",seed);
    }
}

#[test]
fn disconnected_input_is_rejected()
{
    let graph = weighted_graph(&[(0,1,3),(2,3,4)]);
    let error = synthesize(&graph,limits(9,4)).expect_err("two components");
    assert!(matches!(error.kind,ErrorKind::DisconnectedTraffic));
    assert!(!error.is_external());
    let empty = TrafficGraph::new();
    assert!(synthesize(&empty,limits(9,4)).is_err());
}

#[test]
fn hub_of_triangles_rewires_a_bridge()
{
    //Switch 0 reaches five triangles {1,2,3},{4,5,6},...,{13,14,15}, each through a bridge.
    let mut links = vec![];
    for k in 0..5
    {
        let (t0,t1,t2) = (1+3*k,2+3*k,3+3*k);
        links.push((0,t0,100*(k as u64+1)));
        links.push((t0,t1,10+k as u64));
        links.push((t0,t2,20+k as u64));
        links.push((t1,t2,1+k as u64));
    }
    let graph = weighted_graph(&links);
    let reduction = synthesize(&graph,limits(20,4)).expect("connected input");
    //Bridge 0-1 goes; the lightest links of both sides, 5-6 and 2-3, become 2-5 and 3-6.
    //Then 5-6 is restored from the ledger before the traffic of 2-3 is moved.
    assert_eq!(reduction.graph.degree(0),4);
    assert!(reduction.graph.is_connected());
    assert_eq!(reduction.graph.links(),vec![
        (0,4),(0,7),(0,10),(0,13),
        (1,2),(1,3),(2,5),(3,6),
        (4,5),(4,6),(5,6),
        (7,8),(7,9),(8,9),
        (10,11),(10,12),(11,12),
        (13,14),(13,15),(14,15),
    ]);
    assert_eq!(reduction.graph.weight(Edge::new(5,6)),Some(1));
    assert_eq!(reduction.graph.weight(Edge::new(0,4)),Some(300));
    assert_eq!(reduction.graph.weight(Edge::new(2,5)),Some(103));
    assert_eq!(reduction.graph.weight(Edge::new(3,6)),Some(3));
    assert_eq!(reduction.graph.weight(Edge::new(1,2)),Some(112));
    assert_eq!(reduction.ledger.iter().map(|e|(e.edge,e.weight)).collect::<Vec<_>>(),vec![(Edge::new(2,3),1),(Edge::new(0,1),100)]);
    assert!(reduction.outcome.is_feasible());
}

#[test]
fn overloaded_neighbours_are_relieved_first()
{
    //Switch 1 is over the degree bound too, so 0-1 goes before the lighter 0-2.
    let graph = weighted_graph(&[
        (0,1,50),(0,2,5),(0,3,10),(0,4,15),(0,5,20),
        (1,6,7),(1,7,7),(1,8,7),(1,9,7),(2,9,7),
    ]);
    let reduction = synthesize(&graph,limits(10,4)).expect("connected input");
    assert!(!reduction.graph.contains_edge(Edge::new(0,1)));
    //The traffic of 0-1 takes 0-2-9-1.
    assert_eq!(reduction.graph.weight(Edge::new(0,2)),Some(55));
    assert_eq!(reduction.graph.weight(Edge::new(2,9)),Some(57));
    assert_eq!(reduction.graph.weight(Edge::new(1,9)),Some(57));
    assert_eq!(reduction.graph.degree(0),4);
    assert_eq!(reduction.graph.degree(1),4);
    assert_eq!(reduction.graph.num_links(),9);
    assert!(reduction.outcome.is_feasible());
}

#[test]
fn degree_reduction_restores_removed_link()
{
    //Wheel of hub 0 over the cycle 1-2-3-4-5, without spoke 0-3, plus the light chord 1-3.
    let graph = weighted_graph(&[
        (0,1,50),(0,2,60),(0,4,70),(0,5,80),
        (1,2,20),(2,3,25),(3,4,30),(4,5,30),(1,5,30),
        (1,3,1),
    ]);
    let reduction = synthesize(&graph,limits(9,3)).expect("connected input");
    //1-3 is removed to meet the link bound. When 0-1 is removed for the degree of 0 there is room for 1-3 again.
    assert_eq!(reduction.graph.weight(Edge::new(1,3)),Some(0));
    assert!(!reduction.graph.contains_edge(Edge::new(0,1)));
    assert_eq!(reduction.graph.links(),vec![(0,2),(0,4),(0,5),(1,2),(1,3),(1,5),(2,3),(3,4),(4,5)]);
    assert_eq!(reduction.graph.weight(Edge::new(0,2)),Some(110));
    assert_eq!(reduction.graph.weight(Edge::new(1,2)),Some(71));
    assert_eq!(reduction.graph.weight(Edge::new(2,3)),Some(26));
    assert_eq!(reduction.ledger.iter().map(|e|(e.edge,e.weight)).collect::<Vec<_>>(),vec![(Edge::new(0,1),50)]);
    assert!(reduction.outcome.is_feasible());
}
