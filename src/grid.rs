//! # Grid
//!
//! A fixed-size, row-major two-dimensional container.
//!
//! The shape is decided at construction and never changes afterwards; only the
//! element values are mutable. Every other part of the crate (control grids,
//! color distributions, dense vertex grids) is built on top of it.

use crate::vector::VectorArithmetic;
use serde::Serialize;
use std::ops::{Add, Index, IndexMut, Sub};

/// A two-dimensional grid of `T`, stored row by row.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Grid<T> {
    elements: Vec<T>,
    width: usize,
    height: usize,
}

impl<T: Clone> Grid<T> {
    /// Creates a `width * height` grid filled with copies of `fill`.
    pub fn new(width: usize, height: usize, fill: T) -> Self {
        Self {
            elements: vec![fill; width * height],
            width,
            height,
        }
    }
}

impl<T> Grid<T> {
    /// Builds a grid from a flat row-major list. The height is inferred.
    ///
    /// # Panics
    /// If `width` is zero or the element count is not a multiple of `width`.
    pub fn from_vec(width: usize, elements: Vec<T>) -> Self {
        assert!(width > 0, "grid width must be positive");
        assert!(
            elements.len() % width == 0,
            "{} elements do not form rows of width {}",
            elements.len(),
            width
        );
        let height = elements.len() / width;
        Self {
            elements,
            width,
            height,
        }
    }

    /// Builds a grid from whatever `generator` returns. See [`Grid::from_vec`].
    pub fn with_generator(width: usize, generator: impl FnOnce() -> Vec<T>) -> Self {
        Self::from_vec(width, generator())
    }

    /// Builds a grid by evaluating `f(x, y)` for every cell.
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut elements = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                elements.push(f(x, y));
            }
        }
        Self {
            elements,
            width,
            height,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of cells, always `width * height`.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Flat index of the cell at column `x`, row `y`.
    #[inline]
    pub fn index_of(&self, x: usize, y: usize) -> usize {
        assert!(
            x < self.width && y < self.height,
            "({x}, {y}) is outside a {}x{} grid",
            self.width,
            self.height
        );
        x + y * self.width
    }

    /// Checked access. Returns `None` outside the grid.
    pub fn get(&self, x: usize, y: usize) -> Option<&T> {
        if x < self.width && y < self.height {
            self.elements.get(x + y * self.width)
        } else {
            None
        }
    }

    /// Checked mutable access. Returns `None` outside the grid.
    pub fn get_mut(&mut self, x: usize, y: usize) -> Option<&mut T> {
        if x < self.width && y < self.height {
            self.elements.get_mut(x + y * self.width)
        } else {
            None
        }
    }

    /// Overwrites the cell at `(x, y)`.
    ///
    /// # Panics
    /// If the coordinate is outside the grid.
    pub fn set(&mut self, x: usize, y: usize, value: T) {
        let i = self.index_of(x, y);
        self.elements[i] = value;
    }

    pub fn elements(&self) -> &[T] {
        &self.elements
    }

    pub fn elements_mut(&mut self) -> &mut [T] {
        &mut self.elements
    }

    pub fn into_elements(self) -> Vec<T> {
        self.elements
    }

    /// Iterates over `(x, y, &value)` in row-major order.
    pub fn iter_cells(&self) -> impl Iterator<Item = (usize, usize, &T)> + '_ {
        let width = self.width;
        self.elements
            .iter()
            .enumerate()
            .map(move |(i, v)| (i % width, i / width, v))
    }

    /// Maps every element, keeping the shape.
    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> Grid<U> {
        Grid {
            elements: self.elements.iter().map(f).collect(),
            width: self.width,
            height: self.height,
        }
    }
}

impl<T> Index<usize> for Grid<T> {
    type Output = T;

    fn index(&self, i: usize) -> &T {
        &self.elements[i]
    }
}

impl<T> IndexMut<usize> for Grid<T> {
    fn index_mut(&mut self, i: usize) -> &mut T {
        &mut self.elements[i]
    }
}

impl<T> Index<(usize, usize)> for Grid<T> {
    type Output = T;

    fn index(&self, (x, y): (usize, usize)) -> &T {
        &self.elements[self.index_of(x, y)]
    }
}

impl<T> IndexMut<(usize, usize)> for Grid<T> {
    fn index_mut(&mut self, (x, y): (usize, usize)) -> &mut T {
        let i = self.index_of(x, y);
        &mut self.elements[i]
    }
}

// Element-wise arithmetic keeps the left operand's shape. Cells missing on the
// right-hand side count as zero.
fn zip_with<T: VectorArithmetic + Clone>(
    lhs: Grid<T>,
    rhs: Grid<T>,
    op: impl Fn(T, T) -> T,
) -> Grid<T> {
    let mut rhs = rhs.elements.into_iter();
    let elements = lhs
        .elements
        .into_iter()
        .map(|l| op(l, rhs.next().unwrap_or_else(T::zero)))
        .collect();
    Grid {
        elements,
        width: lhs.width,
        height: lhs.height,
    }
}

impl<T: VectorArithmetic + Clone> Add for Grid<T> {
    type Output = Grid<T>;

    fn add(self, rhs: Self) -> Self {
        zip_with(self, rhs, |a, b| a + b)
    }
}

impl<T: VectorArithmetic + Clone> Sub for Grid<T> {
    type Output = Grid<T>;

    fn sub(self, rhs: Self) -> Self {
        zip_with(self, rhs, |a, b| a - b)
    }
}

impl<T: VectorArithmetic + Clone> VectorArithmetic for Grid<T> {
    /// The empty grid.
    fn zero() -> Self {
        Grid {
            elements: Vec::new(),
            width: 0,
            height: 0,
        }
    }

    fn scale(&mut self, factor: f64) {
        for element in &mut self.elements {
            element.scale(factor);
        }
    }

    fn magnitude_squared(&self) -> f64 {
        self.elements.iter().map(|e| e.magnitude_squared()).sum()
    }
}
