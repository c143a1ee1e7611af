/// A single measured concentration for one subject at one time point
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    subject_id: String,
    time_h: f64,
    concentration_mg_l: f64,
    row: usize,
}

impl Observation {
    pub fn new(
        subject_id: impl Into<String>,
        time_h: f64,
        concentration_mg_l: f64,
        row: usize,
    ) -> Self {
        Observation {
            subject_id: subject_id.into(),
            // Normalise -0.0 so that grouping by exact time treats it as 0.0
            time_h: time_h + 0.0,
            concentration_mg_l,
            row,
        }
    }

    pub fn subject_id(&self) -> &str {
        &self.subject_id
    }

    /// Time since dose, in hours
    pub fn time(&self) -> f64 {
        self.time_h
    }

    /// Measured concentration, in mg/L
    pub fn concentration(&self) -> f64 {
        self.concentration_mg_l
    }

    /// Zero-based index of the data row this observation was read from
    pub fn row(&self) -> usize {
        self.row
    }
}

/// An immutable collection of [Observation]s, in the order they were read
///
/// A [Dataset] is produced by [Dataset::from_path] or [Dataset::from_reader] (see [crate::routines::datafile]),
/// and is the input to the derivations in [crate::routines::derive].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    observations: Vec<Observation>,
}

impl Dataset {
    pub fn new(observations: Vec<Observation>) -> Self {
        Dataset { observations }
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Distinct subject identifiers, in order of first appearance
    pub fn subject_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = Vec::new();
        for obs in &self.observations {
            if !ids.contains(&obs.subject_id()) {
                ids.push(obs.subject_id());
            }
        }
        ids
    }

    /// Distinct observation times, sorted ascending
    pub fn times(&self) -> Vec<f64> {
        let mut times: Vec<f64> = self.observations.iter().map(|obs| obs.time()).collect();
        times.sort_by(f64::total_cmp);
        times.dedup();
        times
    }
}

impl From<Vec<Observation>> for Dataset {
    fn from(observations: Vec<Observation>) -> Self {
        Dataset::new(observations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_zero_time_is_normalised() {
        let obs = Observation::new("1", -0.0, 0.0, 0);
        assert!(obs.time().is_sign_positive());
        assert_eq!(obs.time().to_bits(), 0.0_f64.to_bits());
    }

    #[test]
    fn subject_ids_keep_first_appearance() {
        let data = Dataset::new(vec![
            Observation::new("b", 0.0, 0.0, 0),
            Observation::new("a", 0.0, 0.0, 1),
            Observation::new("b", 1.0, 2.0, 2),
        ]);
        assert_eq!(data.subject_ids(), vec!["b", "a"]);
    }

    #[test]
    fn times_are_sorted_and_unique() {
        let data = Dataset::new(vec![
            Observation::new("1", 2.0, 1.0, 0),
            Observation::new("1", 0.5, 1.0, 1),
            Observation::new("2", 2.0, 3.0, 2),
        ]);
        assert_eq!(data.times(), vec![0.5, 2.0]);
        assert_eq!(data.len(), 3);
    }
}
