use crate::records::{error::PointError, point::Point, precision::Precision};

/// Points destined for one database, written together in a single call.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchPoints {
    database: String,
    precision: Precision,
    points: Vec<Point>,
}

impl BatchPoints {
    pub fn new(database: &str, precision: Precision) -> Self {
        BatchPoints {
            database: database.to_string(),
            precision,
            points: Vec::new(),
        }
    }

    pub fn add_point(&mut self, point: Point) {
        self.points.push(point);
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    pub fn precision(&self) -> Precision {
        self.precision
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Newline-separated line protocol for every point, in insertion order.
    pub fn to_line_protocol(&self) -> Result<String, PointError> {
        let lines = self
            .points
            .iter()
            .map(|point| point.to_line(self.precision))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(lines.join("\n"))
    }
}
