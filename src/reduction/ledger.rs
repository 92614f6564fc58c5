
use std::collections::VecDeque;

use crate::topology::{rank_edges,Ranking,WeightedEdge};

///The removed-edge ledger. Links are appended when removed, tagged with the traffic they carried at that moment, and may later be popped to be restored.
///It is owned by one reduction run and passed around by exclusive reference.
#[derive(Debug,Default,PartialEq,Eq)]
pub struct Ledger
{
	entries: VecDeque<WeightedEdge>,
}

impl Ledger
{
	pub fn new() -> Ledger
	{
		Ledger::default()
	}
	pub fn push(&mut self, entry:WeightedEdge)
	{
		self.entries.push_back(entry);
	}
	///Take the next candidate. After `sort_descending` this is the heaviest one.
	pub fn pop(&mut self) -> Option<WeightedEdge>
	{
		self.entries.pop_front()
	}
	///Put back a candidate that could not be restored. It goes behind the rest.
	pub fn put_back(&mut self, entry:WeightedEdge)
	{
		self.entries.push_back(entry);
	}
	pub fn sort_descending(&mut self)
	{
		rank_edges(self.entries.make_contiguous(),Ranking::Descending);
	}
	pub fn len(&self) -> usize
	{
		self.entries.len()
	}
	pub fn is_empty(&self) -> bool
	{
		self.entries.is_empty()
	}
	pub fn iter(&self) -> impl Iterator<Item=&WeightedEdge>
	{
		self.entries.iter()
	}
}
