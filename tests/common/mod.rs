#![allow(dead_code)]

use nocsynth::*;
use rand::rngs::StdRng;
use rand::{Rng,SeedableRng};

///Text of a network report. Each `(source,destination,bytes)` becomes one directed link section.
pub fn network_report_text(transfers:u64, message_size:f64, latency:f64, links:&[(usize,usize,u64)], sent_bytes:&[u64]) -> String
{
    let mut text = String::from("; Report for network net0\n\n");
    text.push_str("[ Network.net0.General ]\n");
    text.push_str(&format!("Transfers = {}\n",transfers));
    text.push_str(&format!("AverageMessageSize = {:.2}\n",message_size));
    text.push_str(&format!("AverageLatency = {:.4}\n\n",latency));
    for (index,&(source,destination,bytes)) in links.iter().enumerate()
    {
        text.push_str(&format!("[ Network.net0.Link.link_<sw{}.out_buf_{}>_<sw{}.in_buf_{}> ]\n",source,index%4,destination,index%4));
        text.push_str("Config.Bandwidth = 256\n");
        text.push_str(&format!("TransferredMessages = {}\n",bytes/64));
        text.push_str(&format!("TransferredBytes = {}\n",bytes));
        text.push_str("BusyCycles = 10\n\n");
    }
    for (node,bytes) in sent_bytes.iter().enumerate()
    {
        text.push_str(&format!("[ Network.net0.Node.n{} ]\n",node));
        text.push_str("Config.InputBufferSize = 1024\n");
        text.push_str(&format!("SentBytes = {}\n",bytes));
        text.push_str("SentMessages = 3\n\n");
    }
    text
}

///Standard output of the simulator with the `[ x86 ]` summary.
pub fn x86_summary_text(instructions:u64, nanoseconds:f64, cycles:u64) -> String
{
    let mut text = String::from("; Multi2Sim\n[ General ]\nRealTime = 1.00 [s]\n\n[ x86 ]\n");
    let fields = ["RealTime = 1.00 [s]","Instructions = 0","InstructionsPerSecond = 0","Contexts = 1","Memory = 0","SimEnd = MaxInst","","","","","","",""];
    for offset in 1..=14
    {
        match offset
        {
            7 => text.push_str(&format!("CommittedInstructions = {}\n",instructions)),
            12 => text.push_str(&format!("SimTime = {:.2} [ns]\n",nanoseconds)),
            14 => text.push_str(&format!("Cycles = {}\n",cycles)),
            _ => match fields[offset-1]
            {
                "" => text.push_str(&format!("Field{} = 0\n",offset)),
                field => text.push_str(&format!("{}\n",field)),
            },
        }
    }
    text
}

pub fn weighted_graph(links:&[(usize,usize,Weight)]) -> TrafficGraph
{
    let mut graph = TrafficGraph::new();
    for &(a,b,weight) in links
    {
        graph.add_edge(Edge::new(a,b),weight);
    }
    graph
}

///Complete graph with random traffic on every link.
pub fn random_complete_graph(switches:usize, rng:&mut StdRng) -> TrafficGraph
{
    let mut graph = TrafficGraph::new();
    for a in 0..switches
    {
        for b in (a+1)..switches
        {
            graph.add_edge(Edge::new(a,b),rng.gen_range(0..10_000));
        }
    }
    graph
}

///Random connected graph: a random spanning tree plus `extra` random links.
pub fn random_connected_graph(switches:usize, extra:usize, rng:&mut StdRng) -> TrafficGraph
{
    let mut graph = TrafficGraph::new();
    graph.add_node(0);
    for node in 1..switches
    {
        let parent = rng.gen_range(0..node);
        graph.add_edge(Edge::new(parent,node),rng.gen_range(1..1_000));
    }
    for _ in 0..extra
    {
        let a = rng.gen_range(0..switches);
        let b = rng.gen_range(0..switches);
        if a!=b
        {
            graph.add_edge(Edge::new(a,b),rng.gen_range(1..1_000));
        }
    }
    graph
}

pub fn seeded(seed:u64) -> StdRng
{
    StdRng::seed_from_u64(seed)
}

///Report of a fully-connected network of `switches` where every link carries random traffic in both directions.
pub fn fully_connected_report(switches:usize, rng:&mut StdRng) -> String
{
    let mut links = vec![];
    for a in 0..switches
    {
        for b in 0..switches
        {
            if a!=b
            {
                links.push((a,b,rng.gen_range(64..50_000)));
            }
        }
    }
    let sent:Vec<u64> = (0..switches+2).map(|_|rng.gen_range(1_000..100_000)).collect();
    network_report_text(12_000,40.5,3.25,&links,&sent)
}
