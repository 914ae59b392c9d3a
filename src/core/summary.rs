use crate::core::ScholarshipRecord;
use chrono::NaiveDate;
use std::fmt;

/// What a dry run reports about a normalized batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    pub missing_required: usize,
    pub dated_deadlines: usize,
    pub earliest_deadline: Option<NaiveDate>,
    pub featured: usize,
}

impl BatchSummary {
    pub fn of(batch: &[ScholarshipRecord]) -> Self {
        let deadlines: Vec<NaiveDate> = batch.iter().filter_map(|r| r.deadline_date()).collect();

        Self {
            total: batch.len(),
            missing_required: batch
                .iter()
                .filter(|r| !r.missing_required_fields().is_empty())
                .count(),
            dated_deadlines: deadlines.len(),
            earliest_deadline: deadlines.into_iter().min(),
            featured: batch.iter().filter(|r| r.featured() == Some(true)).count(),
        }
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Scholarships:            {}", self.total)?;
        writeln!(f, "Missing expected fields: {}", self.missing_required)?;
        writeln!(f, "Featured:                {}", self.featured)?;
        write!(f, "Parseable deadlines:     {}", self.dated_deadlines)?;
        if let Some(date) = self.earliest_deadline {
            write!(f, "\nEarliest deadline:       {}", date.format("%Y-%m-%d"))?;
        }
        Ok(())
    }
}
