//! Array values and their three subscripting modes.

use super::{Value, ValueType};
use crate::error::BasicError;
use crate::hash::HashTable;

/// How an array stores and addresses its cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayKind {
    /// Fixed shape, all cells preallocated, row-major addressing.
    Static,
    /// One dimension, grows on demand by doubling.
    Dynamic,
    /// One dimension, keyed by integer/real/string through a hash table,
    /// cells in insertion order.
    Assoc,
}

/// An array of Int, Real or Str cells.
#[derive(Debug, Clone)]
pub struct ArrayVal {
    elem: ValueType,
    kind: ArrayKind,
    /// Dimension sizes. For Dynamic/Assoc, `dims[0]` is the cell capacity.
    dims: Vec<usize>,
    /// Row-major coefficients, `coord_mult[i] = Π dims[i+1..]`.
    coord_mult: Vec<usize>,
    /// Live cell count. Equals the full size for Static arrays.
    filled: usize,
    cells: Vec<Value>,
    /// Key bytes → cell index, Assoc only.
    index: Option<Box<HashTable<usize>>>,
}

impl ArrayVal {
    /// Create an array. Element type must be scalar; Dynamic and Assoc
    /// arrays are one-dimensional.
    pub fn new(elem: ValueType, kind: ArrayKind, dims: &[usize]) -> Result<Self, BasicError> {
        if matches!(elem, ValueType::Array | ValueType::Func) {
            return Err(BasicError::ArrayTypeImpossible);
        }
        if kind != ArrayKind::Static && dims.len() != 1 {
            return Err(BasicError::ArrayTypeImpossible);
        }
        if dims.is_empty() {
            return Err(BasicError::ArrayTypeImpossible);
        }

        let mut total: usize = 1;
        for (i, &dim) in dims.iter().enumerate() {
            if dim == 0 {
                return Err(BasicError::ZeroDimension(i));
            }
            total = total
                .checked_mul(dim)
                .ok_or(BasicError::DimensionTooLarge(i))?;
        }

        let mut coord_mult = vec![1usize; dims.len()];
        for i in (0..dims.len().saturating_sub(1)).rev() {
            coord_mult[i] = coord_mult[i + 1]
                .checked_mul(dims[i + 1])
                .ok_or(BasicError::DimensionTooLarge(i))?;
        }

        let mut array = Self {
            elem,
            kind,
            dims: dims.to_vec(),
            coord_mult,
            filled: 0,
            cells: Vec::new(),
            index: (kind == ArrayKind::Assoc).then(|| Box::new(HashTable::new())),
        };

        match kind {
            ArrayKind::Static => {
                array
                    .cells
                    .try_reserve_exact(total)
                    .map_err(|_| BasicError::OutOfMemory)?;
                for _ in 0..total {
                    array.cells.push(Value::default_of(elem)?);
                }
                array.filled = total;
            }
            ArrayKind::Dynamic | ArrayKind::Assoc => {
                array
                    .cells
                    .try_reserve_exact(dims[0])
                    .map_err(|_| BasicError::OutOfMemory)?;
            }
        }
        Ok(array)
    }

    /// The element type cells are created with.
    pub fn elem_type(&self) -> ValueType {
        self.elem
    }

    /// The array kind.
    pub fn kind(&self) -> ArrayKind {
        self.kind
    }

    /// Dimension sizes.
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    /// Live cell count; insertion order is observable through it for Assoc
    /// arrays.
    pub fn filled(&self) -> usize {
        self.filled
    }

    /// Live cell at `index`, in storage order.
    pub fn cell_at(&self, index: usize) -> Option<&Value> {
        self.cells.get(index).filter(|_| index < self.filled)
    }

    /// Resolve a subscript argument list to a cell.
    pub fn subscript(&mut self, args: &[Value]) -> Result<&mut Value, BasicError> {
        match self.kind {
            ArrayKind::Static => self.subscript_static(args),
            ArrayKind::Dynamic => self.subscript_dynamic(args),
            ArrayKind::Assoc => self.subscript_assoc(args),
        }
    }

    fn check_arity(&self, args: &[Value]) -> Result<(), BasicError> {
        let ndims = self.dims.len();
        if args.len() < ndims {
            return Err(BasicError::TooFewDimensions);
        }
        if args.len() > ndims {
            return Err(BasicError::TooManyDimensions);
        }
        Ok(())
    }

    fn numeric_index(arg: &Value) -> Result<usize, BasicError> {
        if !matches!(arg.value_type(), ValueType::Int | ValueType::Real) {
            return Err(BasicError::TypeMismatch);
        }
        let d = arg.get_int();
        if d < 0 {
            return Err(BasicError::BadSubscript);
        }
        Ok(d as usize)
    }

    fn subscript_static(&mut self, args: &[Value]) -> Result<&mut Value, BasicError> {
        self.check_arity(args)?;
        let mut pos = 0usize;
        for (i, arg) in args.iter().enumerate() {
            let index = Self::numeric_index(arg)?;
            if index >= self.dims[i] {
                return Err(BasicError::IndexOutOfRange(i));
            }
            pos += self.coord_mult[i] * index;
        }
        self.cells.get_mut(pos).ok_or(BasicError::InterpretError)
    }

    /// Grow the capacity record to hold `index`, doubling first.
    fn grow_capacity(&mut self, index: usize) -> Result<(), BasicError> {
        if index < self.dims[0] {
            return Ok(());
        }
        let doubled = self.dims[0].saturating_mul(2);
        let newdim = doubled.max(index.checked_add(1).ok_or(BasicError::ArrayTooLarge)?);
        if newdim > isize::MAX as usize / std::mem::size_of::<Value>() {
            return Err(BasicError::ArrayTooLarge);
        }
        self.cells
            .try_reserve(newdim - self.cells.len())
            .map_err(|_| BasicError::OutOfMemory)?;
        self.dims[0] = newdim;
        Ok(())
    }

    fn subscript_dynamic(&mut self, args: &[Value]) -> Result<&mut Value, BasicError> {
        self.check_arity(args)?;
        let index = Self::numeric_index(&args[0])?;
        self.grow_capacity(index)?;
        if index >= self.filled {
            for _ in self.filled..=index {
                self.cells.push(Value::default_of(self.elem)?);
            }
            self.filled = index + 1;
        }
        self.cells
            .get_mut(index)
            .ok_or(BasicError::InterpretError)
    }

    fn subscript_assoc(&mut self, args: &[Value]) -> Result<&mut Value, BasicError> {
        self.check_arity(args)?;
        let key: Vec<u8> = match &args[0] {
            Value::Int(v) => v.to_le_bytes().to_vec(),
            Value::Real(v) => v.to_le_bytes().to_vec(),
            Value::Str(bytes) => bytes.clone(),
            _ => return Err(BasicError::TypeMismatch),
        };

        let table = self.index.as_mut().ok_or(BasicError::InterpretError)?;
        if let Some(&cell_index) = table.find(&key) {
            return self
                .cells
                .get_mut(cell_index)
                .ok_or(BasicError::InterpretError);
        }

        // miss: append a fresh default cell and record the key
        let cell_index = self.filled;
        self.grow_capacity(cell_index)?;
        self.cells.push(Value::default_of(self.elem)?);
        self.filled = cell_index + 1;
        self.index
            .as_mut()
            .ok_or(BasicError::InterpretError)?
            .insert(&key, cell_index);
        self.cells
            .get_mut(cell_index)
            .ok_or(BasicError::InterpretError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creation_rules() {
        assert!(ArrayVal::new(ValueType::Int, ArrayKind::Static, &[2, 3]).is_ok());
        assert_eq!(
            ArrayVal::new(ValueType::Array, ArrayKind::Static, &[2]).unwrap_err(),
            BasicError::ArrayTypeImpossible
        );
        assert_eq!(
            ArrayVal::new(ValueType::Func, ArrayKind::Static, &[2]).unwrap_err(),
            BasicError::ArrayTypeImpossible
        );
        assert_eq!(
            ArrayVal::new(ValueType::Int, ArrayKind::Dynamic, &[2, 2]).unwrap_err(),
            BasicError::ArrayTypeImpossible
        );
        assert_eq!(
            ArrayVal::new(ValueType::Int, ArrayKind::Static, &[2, 0]).unwrap_err(),
            BasicError::ZeroDimension(1)
        );
    }

    #[test]
    fn static_subscript_is_row_major_and_checked() {
        let mut a = ArrayVal::new(ValueType::Int, ArrayKind::Static, &[2, 3, 4]).unwrap();
        a.subscript(&[Value::Int(1), Value::Int(2), Value::Int(3)])
            .unwrap()
            .set_int(7);
        assert_eq!(
            a.subscript(&[Value::Int(1), Value::Int(2), Value::Int(3)])
                .unwrap()
                .get_int(),
            7
        );
        // untouched cells read as the element default
        assert_eq!(
            a.subscript(&[Value::Int(0), Value::Int(0), Value::Int(0)])
                .unwrap()
                .get_int(),
            0
        );
        assert_eq!(
            a.subscript(&[Value::Int(0), Value::Int(3), Value::Int(0)])
                .unwrap_err(),
            BasicError::IndexOutOfRange(1)
        );
        assert_eq!(
            a.subscript(&[Value::Int(0), Value::Int(0)]).unwrap_err(),
            BasicError::TooFewDimensions
        );
        assert_eq!(
            a.subscript(&[Value::Int(0), Value::Int(0), Value::Int(0), Value::Int(0)])
                .unwrap_err(),
            BasicError::TooManyDimensions
        );
        assert_eq!(
            a.subscript(&[Value::Int(-1), Value::Int(0), Value::Int(0)])
                .unwrap_err(),
            BasicError::BadSubscript
        );
        assert_eq!(
            a.subscript(&[Value::Str(b"x".to_vec()), Value::Int(0), Value::Int(0)])
                .unwrap_err(),
            BasicError::TypeMismatch
        );
    }

    #[test]
    fn static_cells_do_not_alias() {
        let dims = [3usize, 4, 5];
        let mut a = ArrayVal::new(ValueType::Int, ArrayKind::Static, &dims).unwrap();
        let mut n = 0i64;
        for i in 0..dims[0] {
            for j in 0..dims[1] {
                for k in 0..dims[2] {
                    let args = [Value::Int(i as i64), Value::Int(j as i64), Value::Int(k as i64)];
                    a.subscript(&args).unwrap().set_int(n);
                    n += 1;
                }
            }
        }
        let mut n = 0i64;
        for i in 0..dims[0] {
            for j in 0..dims[1] {
                for k in 0..dims[2] {
                    let args = [Value::Int(i as i64), Value::Int(j as i64), Value::Int(k as i64)];
                    assert_eq!(a.subscript(&args).unwrap().get_int(), n);
                    n += 1;
                }
            }
        }
    }

    #[test]
    fn dynamic_grows_and_default_initializes() {
        let mut a = ArrayVal::new(ValueType::Int, ArrayKind::Dynamic, &[4]).unwrap();
        assert_eq!(a.filled(), 0);
        a.subscript(&[Value::Int(10)]).unwrap().set_int(5);
        assert_eq!(a.filled(), 11);
        assert!(a.dims()[0] >= 11);
        // intermediate cells exist and default to zero
        assert_eq!(a.subscript(&[Value::Int(3)]).unwrap().get_int(), 0);
        assert_eq!(a.subscript(&[Value::Int(10)]).unwrap().get_int(), 5);
        // real indices truncate
        a.subscript(&[Value::Real(2.9)]).unwrap().set_int(9);
        assert_eq!(a.subscript(&[Value::Int(2)]).unwrap().get_int(), 9);
    }

    #[test]
    fn assoc_finds_the_same_cell_per_key() {
        let mut a = ArrayVal::new(ValueType::Str, ArrayKind::Assoc, &[2]).unwrap();
        a.subscript(&[Value::Str(b"key".to_vec())])
            .unwrap()
            .set_str(b"v".to_vec().into());
        assert_eq!(
            a.subscript(&[Value::Str(b"key".to_vec())])
                .unwrap()
                .get_str()
                .as_ref(),
            b"v"
        );
        assert_eq!(a.filled(), 1);

        // a missing key creates an empty cell, observable through filled()
        assert_eq!(
            a.subscript(&[Value::Str(b"absent".to_vec())])
                .unwrap()
                .get_str()
                .as_ref(),
            b""
        );
        assert_eq!(a.filled(), 2);
    }

    #[test]
    fn assoc_keys_may_be_int_real_or_str() {
        let mut a = ArrayVal::new(ValueType::Int, ArrayKind::Assoc, &[2]).unwrap();
        a.subscript(&[Value::Int(1)]).unwrap().set_int(10);
        a.subscript(&[Value::Real(1.5)]).unwrap().set_int(20);
        a.subscript(&[Value::Str(b"1".to_vec())]).unwrap().set_int(30);
        // three distinct keys, three cells
        assert_eq!(a.filled(), 3);
        assert_eq!(a.subscript(&[Value::Int(1)]).unwrap().get_int(), 10);
        assert_eq!(a.subscript(&[Value::Real(1.5)]).unwrap().get_int(), 20);
        assert_eq!(a.subscript(&[Value::Str(b"1".to_vec())]).unwrap().get_int(), 30);
    }
}
