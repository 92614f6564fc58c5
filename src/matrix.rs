
///A simple matrix struct. Used for the hop distances between the switches of a topology.
#[derive(Debug,Clone,PartialEq)]
pub struct Matrix<T>
{
	data: Vec<T>,
	num_columns: usize,
}

impl<T> Matrix<T>
{
	///Read a matrix entry.
	pub fn get(&self,row:usize,column:usize) -> &T
	{
		&self.data[row*self.num_columns+column]
	}
	///Read/write a matrix entry.
	pub fn get_mut(&mut self,row:usize,column:usize) -> &mut T
	{
		&mut self.data[row*self.num_columns+column]
	}
	///Get the number of rows
	pub fn get_rows(&self) -> usize
	{
		if self.num_columns==0 { 0 } else { self.data.len()/self.num_columns }
	}
	///Get the number of columns
	pub fn get_columns(&self) -> usize
	{
		self.num_columns
	}
	///Build a matrix with constant values.
	pub fn constant(value:T,num_rows:usize,num_columns:usize) -> Matrix<T> where T:Clone
	{
		Matrix{
			data: vec![value;num_rows*num_columns],
			num_columns,
		}
	}
	/// Iterate over elements outside the diagonal.
	pub fn outside_diagonal(&self) -> OutsideDiagonal<T>
	{
		OutsideDiagonal{ matrix: self, row:0, column:0 }
	}
}

pub struct OutsideDiagonal<'a, T>
{
	matrix: &'a Matrix<T>,
	row: usize,
	column: usize,
}

impl<'a,T> Iterator for OutsideDiagonal<'a,T>
{
	type Item = &'a T;
	fn next(&mut self) -> Option<<Self as Iterator>::Item>
	{
		loop
		{
			if self.row >= self.matrix.get_rows()
			{
				return None;
			}
			if self.column >= self.matrix.get_columns()
			{
				self.column = 0;
				self.row += 1;
				continue;
			}
			let (row,column) = (self.row,self.column);
			self.column += 1;
			if row != column
			{
				return Some(self.matrix.get(row,column));
			}
		}
	}
}
