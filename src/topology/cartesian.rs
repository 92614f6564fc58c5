
use std::fmt::{self,Display,Formatter};
use std::str::FromStr;

use itertools::Itertools;

use crate::error::Error;

///Coordinates of switches laid out in a grid.
///The first coordinate varies fastest: in a 3x3 grid switch 4 is at `[1,1]` and switch 5 at `[2,1]`.
#[derive(Debug,Clone,PartialEq,Eq)]
pub struct CartesianData
{
	pub sides: Vec<usize>,
	pub size: usize,
}

impl CartesianData
{
	pub fn new(sides:&[usize]) -> CartesianData
	{
		CartesianData{
			sides:sides.to_vec(),
			size: sides.iter().product(),
		}
	}
	///The most square 2D grid with exactly `switches` switches. For 9 this is 3x3, for 12 it is 4x3 and for a prime it is a line.
	pub fn most_square(switches:usize) -> CartesianData
	{
		let rows = (1..=switches).take_while(|r|r*r<=switches).filter(|r|switches%r==0).last().unwrap_or(1);
		CartesianData::new(&[switches/rows.max(1),rows])
	}
	pub fn unpack(&self, mut router_index: usize) -> Vec<usize>
	{
		if router_index>=self.size
		{
			panic!("router_index={} is greater than the size of the CartesianData={}",router_index,self.size);
		}
		let mut r=Vec::with_capacity(self.sides.len());
		for side in self.sides.iter()
		{
			r.push(router_index%side);
			router_index/=side;
		}
		r
	}
	pub fn pack(&self, coordinates:&[usize]) -> usize
	{
		for (c,s) in coordinates.iter().zip(self.sides.iter())
		{
			if *c>=*s
			{
				panic!("coordinate {} is greater than the side {}",c,s);
			}
		}
		let mut r=0;
		let mut stride=1;
		for (i,side) in self.sides.iter().enumerate()
		{
			r+=coordinates[i]*stride;
			stride*=side;
		}
		r
	}
	///Links to the next switch along each dimension. With `wrap` the last switch of each line is also linked to the first, as in a torus.
	fn grid_links(&self, wrap:bool) -> Vec<(usize,usize)>
	{
		let mut links = vec![];
		for (dimension,&side) in self.sides.iter().enumerate()
		{
			for switch in 0..self.size
			{
				let coordinates = self.unpack(switch);
				let mut next = coordinates.clone();
				if coordinates[dimension]+1<side
				{
					next[dimension] += 1;
				}
				else if wrap && side>2
				{
					next[dimension] = 0;
				}
				else
				{
					continue;
				}
				links.push((switch,self.pack(&next)));
			}
		}
		links
	}
}

///The reference topologies the synthesized one is compared against.
#[derive(Debug,Clone,Copy,PartialEq,Eq)]
pub enum StandardTopology
{
	FullyConnected,
	Ring,
	Mesh,
	Torus,
}

impl StandardTopology
{
	pub const ALL: [StandardTopology;4] = [StandardTopology::FullyConnected,StandardTopology::Ring,StandardTopology::Mesh,StandardTopology::Torus];
	///Name used in the file names of the configurations, as in `mesh-net-config.txt`.
	pub fn name(&self) -> &'static str
	{
		match self
		{
			StandardTopology::FullyConnected => "fully",
			StandardTopology::Ring => "ring",
			StandardTopology::Mesh => "mesh",
			StandardTopology::Torus => "torus",
		}
	}
	///The switch-to-switch links for `switches` switches, each given once.
	pub fn links(&self, switches:usize) -> Vec<(usize,usize)>
	{
		let links:Vec<(usize,usize)> = match self
		{
			StandardTopology::FullyConnected => (0..switches).tuple_combinations().collect(),
			StandardTopology::Ring => match switches
			{
				0|1 => vec![],
				2 => vec![(0,1)],
				_ => (0..switches).map(|switch|(switch,(switch+1)%switches)).collect(),
			},
			StandardTopology::Mesh => CartesianData::most_square(switches).grid_links(false),
			StandardTopology::Torus => CartesianData::most_square(switches).grid_links(true),
		};
		links.into_iter().unique_by(|&(a,b)|(a.min(b),a.max(b))).collect()
	}
}

impl Display for StandardTopology
{
	fn fmt(&self, formatter:&mut Formatter) -> fmt::Result
	{
		write!(formatter,"{}",self.name())
	}
}

impl FromStr for StandardTopology
{
	type Err = Error;
	fn from_str(name:&str) -> Result<StandardTopology,Error>
	{
		StandardTopology::ALL.iter().copied().find(|t|t.name()==name)
			.ok_or_else(||error!(bad_argument).with_message(format!("unknown topology `{}`; expected one of fully, ring, mesh, torus",name)))
	}
}
