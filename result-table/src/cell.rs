use std::cmp::Ordering;

use thousands::Separable;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Number,
    Flag,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellFormat {
    #[default]
    Plain,
    Integer,
    Decimal,
    Percent,
    /// Gil or gold, thousands separated
    Currency,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Empty,
}

impl Cell {
    /// NaN counts as empty so that it always sinks to the bottom of a sorted table.
    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Float(f) => f.is_nan(),
            _ => false,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Cell::Bool(_) => 0,
            Cell::Int(_) | Cell::Float(_) => 1,
            Cell::Text(_) => 2,
            Cell::Empty => 3,
        }
    }

    fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Int(i) => Some(*i as f64),
            Cell::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Ascending order between two cells. Text ignores case first and only uses the
    /// exact bytes to break ties.
    pub fn compare(&self, other: &Cell) -> Ordering {
        match (self, other) {
            (Cell::Int(a), Cell::Int(b)) => a.cmp(b),
            (Cell::Text(a), Cell::Text(b)) => a
                .to_lowercase()
                .cmp(&b.to_lowercase())
                .then_with(|| a.cmp(b)),
            (Cell::Bool(a), Cell::Bool(b)) => a.cmp(b),
            (a, b) => match (a.as_f64(), b.as_f64()) {
                (Some(a), Some(b)) => a.total_cmp(&b),
                _ => a.rank().cmp(&b.rank()),
            },
        }
    }

    /// Unformatted value, used for CSV export and fuzzy matching
    pub fn raw_text(&self) -> String {
        match self {
            Cell::Text(text) => text.clone(),
            Cell::Int(i) => i.to_string(),
            Cell::Float(f) if f.is_nan() => String::new(),
            Cell::Float(f) => f.to_string(),
            Cell::Bool(b) => b.to_string(),
            Cell::Empty => String::new(),
        }
    }

    pub fn display(&self, format: CellFormat) -> String {
        if self.is_empty() {
            return "-".to_string();
        }
        match (self, format) {
            (Cell::Bool(true), _) => "Yes".to_string(),
            (Cell::Bool(false), _) => "No".to_string(),
            (Cell::Text(text), _) => text.clone(),
            (Cell::Int(i), CellFormat::Percent) => format!("{i}%"),
            (Cell::Float(f), CellFormat::Percent) => format!("{f:.2}%"),
            (Cell::Int(i), CellFormat::Currency | CellFormat::Integer) => i.separate_with_commas(),
            (Cell::Float(f), CellFormat::Integer) => (f.round() as i64).separate_with_commas(),
            (Cell::Float(f), CellFormat::Currency) => {
                if f.fract() == 0.0 {
                    (*f as i64).separate_with_commas()
                } else {
                    format!("{f:.2}").separate_with_commas()
                }
            }
            (Cell::Float(f), CellFormat::Decimal) => format!("{f:.2}"),
            (Cell::Int(i), CellFormat::Decimal) => format!("{i}.00"),
            (cell, CellFormat::Plain) => cell.raw_text(),
            (Cell::Empty, _) => "-".to_string(),
        }
    }
}

pub trait ToCell {
    const KIND: ColumnKind;

    fn to_cell(&self) -> Cell;
}

impl ToCell for str {
    const KIND: ColumnKind = ColumnKind::Text;

    fn to_cell(&self) -> Cell {
        Cell::Text(self.to_string())
    }
}

impl ToCell for String {
    const KIND: ColumnKind = ColumnKind::Text;

    fn to_cell(&self) -> Cell {
        Cell::Text(self.clone())
    }
}

impl<T: ToCell + ?Sized> ToCell for &T {
    const KIND: ColumnKind = T::KIND;

    fn to_cell(&self) -> Cell {
        (**self).to_cell()
    }
}

impl<T: ToCell> ToCell for Option<T> {
    const KIND: ColumnKind = T::KIND;

    fn to_cell(&self) -> Cell {
        self.as_ref().map(ToCell::to_cell).unwrap_or(Cell::Empty)
    }
}

impl ToCell for bool {
    const KIND: ColumnKind = ColumnKind::Flag;

    fn to_cell(&self) -> Cell {
        Cell::Bool(*self)
    }
}

macro_rules! int_cell {
    ($($t:ty),*) => {
        $(
            impl ToCell for $t {
                const KIND: ColumnKind = ColumnKind::Number;

                fn to_cell(&self) -> Cell {
                    Cell::Int(i64::from(*self))
                }
            }
        )*
    };
}

int_cell!(i8, i16, i32, i64, u8, u16, u32);

macro_rules! wide_int_cell {
    ($($t:ty),*) => {
        $(
            impl ToCell for $t {
                const KIND: ColumnKind = ColumnKind::Number;

                fn to_cell(&self) -> Cell {
                    i64::try_from(*self)
                        .map(Cell::Int)
                        .unwrap_or(Cell::Float(*self as f64))
                }
            }
        )*
    };
}

wide_int_cell!(u64, usize, isize);

impl ToCell for f64 {
    const KIND: ColumnKind = ColumnKind::Number;

    fn to_cell(&self) -> Cell {
        Cell::Float(*self)
    }
}

impl ToCell for f32 {
    const KIND: ColumnKind = ColumnKind::Number;

    fn to_cell(&self) -> Cell {
        Cell::Float(f64::from(*self))
    }
}

#[cfg(test)]
mod test {
    use std::cmp::Ordering;

    use super::{Cell, CellFormat};

    #[test]
    fn numbers_compare_across_int_and_float() {
        assert_eq!(Cell::Int(3).compare(&Cell::Float(2.5)), Ordering::Greater);
        assert_eq!(Cell::Float(-1.0).compare(&Cell::Int(0)), Ordering::Less);
    }

    #[test]
    fn text_ignores_case() {
        assert_eq!(
            Cell::Text("apple".into()).compare(&Cell::Text("Banana".into())),
            Ordering::Less
        );
    }

    #[test]
    fn display_formats() {
        assert_eq!(Cell::Int(1234567).display(CellFormat::Currency), "1,234,567");
        assert_eq!(Cell::Float(1234.5).display(CellFormat::Currency), "1,234.50");
        assert_eq!(Cell::Float(12.346).display(CellFormat::Percent), "12.35%");
        assert_eq!(Cell::Float(99.6).display(CellFormat::Integer), "100");
        assert_eq!(Cell::Empty.display(CellFormat::Currency), "-");
        assert_eq!(Cell::Float(f64::NAN).display(CellFormat::Plain), "-");
        assert_eq!(Cell::Bool(true).display(CellFormat::Plain), "Yes");
    }
}
