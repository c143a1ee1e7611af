use approx::assert_relative_eq;
use eyre::Result;
use pkseries::prelude::*;

fn sparse() -> Result<Dataset> {
    Ok(Dataset::from_path(
        "src/tests/data/sparse.csv",
        &Columns::default(),
    )?)
}

fn from_str(contents: &str) -> Result<Dataset> {
    Ok(Dataset::from_reader(contents.as_bytes(), &Columns::default())?)
}

/// Every observation ends up in exactly one subject series
#[test]
fn subject_series_partition_the_dataset() -> Result<()> {
    let data = sparse()?;
    let subjects = derive_subject_series(&data)?;

    assert_eq!(subjects.npoints(), data.len());

    let mut from_series: Vec<(String, f64, f64)> = subjects
        .iter()
        .flat_map(|s| {
            s.points()
                .iter()
                .map(move |(t, c)| (s.subject_id().to_string(), *t, *c))
        })
        .collect();
    let mut from_data: Vec<(String, f64, f64)> = data
        .observations()
        .iter()
        .map(|o| (o.subject_id().to_string(), o.time(), o.concentration()))
        .collect();
    from_series.sort_by(|a, b| a.partial_cmp(b).unwrap());
    from_data.sort_by(|a, b| a.partial_cmp(b).unwrap());
    assert_eq!(from_series, from_data);

    Ok(())
}

#[test]
fn subject_points_are_strictly_ascending() -> Result<()> {
    let data = from_str(
        "subject_id,time_h,concentration_mg_l\n\
         9,12,1.1\n9,0,0\n9,1,3.2\n4,24,0.3\n9,0.5,2.0\n4,2,5.5\n",
    )?;
    let subjects = derive_subject_series(&data)?;

    assert_eq!(subjects.subject_ids(), vec!["4", "9"]);
    for series in subjects.iter() {
        assert!(series.times().windows(2).all(|w| w[0] < w[1]));
    }
    assert_eq!(subjects.get("9").unwrap().times(), vec![0.0, 0.5, 1.0, 12.0]);
    assert_eq!(
        subjects.get("9").unwrap().concentrations(),
        vec![0.0, 2.0, 3.2, 1.1]
    );
    Ok(())
}

#[test]
fn one_aggregate_point_per_time() -> Result<()> {
    let data = sparse()?;
    let aggregate = derive_aggregate_series(&data, StdPolicy::Zero);

    assert_eq!(aggregate.len(), data.times().len());
    for time in data.times() {
        let values: Vec<f64> = data
            .observations()
            .iter()
            .filter(|o| o.time() == time)
            .map(|o| o.concentration())
            .collect();
        let point = aggregate.at(time).unwrap();
        assert_eq!(point.n, values.len());
        assert_relative_eq!(
            point.mean,
            values.iter().sum::<f64>() / values.len() as f64
        );
    }

    let at_one = aggregate.at(1.0).unwrap();
    assert_eq!((at_one.mean, at_one.n), (5.0, 3));
    assert_relative_eq!(at_one.std, 1.0, epsilon = 1e-12);
    Ok(())
}

#[test]
fn mean_and_std_of_two_subjects() -> Result<()> {
    let data = from_str("subject_id,time_h,concentration_mg_l\n1,1.0,4.0\n2,1.0,6.0\n")?;
    let aggregate = derive_aggregate_series(&data, StdPolicy::Zero);
    let point = aggregate.at(1.0).unwrap();
    assert_eq!(point.mean, 5.0);
    assert_relative_eq!(point.std, 1.4142135623730951, epsilon = 1e-12);
    Ok(())
}

#[test]
fn time_with_one_subject_is_not_an_error() -> Result<()> {
    let data = sparse()?;

    let zero = derive_aggregate_series(&data, StdPolicy::Zero);
    assert_eq!(zero.at(2.0).unwrap().std, 0.0);
    assert_eq!(zero.at(4.0).unwrap().mean, 1.5);

    let nan = derive_aggregate_series(&data, StdPolicy::Nan);
    assert!(nan.at(2.0).unwrap().std.is_nan());
    assert!(nan.at(4.0).unwrap().std.is_nan());
    Ok(())
}

#[test]
fn derivation_is_idempotent() -> Result<()> {
    let data = sparse()?;

    let first = derive_aggregate_series(&data, StdPolicy::Zero);
    let second = derive_aggregate_series(&data, StdPolicy::Zero);
    let bits = |series: &AggregateSeries| -> Vec<(u64, u64, u64)> {
        series
            .points()
            .iter()
            .map(|p| (p.time_h.to_bits(), p.mean.to_bits(), p.std.to_bits()))
            .collect()
    };
    assert_eq!(bits(&first), bits(&second));

    assert_eq!(derive_subject_series(&data)?, derive_subject_series(&data)?);
    Ok(())
}

#[test]
fn missing_concentration_column() {
    let err = from_str("subject_id,time_h\n1,0\n").unwrap_err();
    let err = err.downcast::<DataError>().unwrap();
    assert!(
        matches!(err, DataError::Schema { ref column } if column == "concentration_mg_l"),
        "{err}"
    );
    assert!(err.to_string().contains("concentration_mg_l"));
}

#[test]
fn duplicate_observation_references_both_rows() -> Result<()> {
    let data = Dataset::from_path("src/tests/data/duplicate.csv", &Columns::default())?;
    match derive_subject_series(&data) {
        Err(DataError::DuplicateObservation {
            subject_id,
            time_h,
            first_row,
            second_row,
        }) => {
            assert_eq!(subject_id, "1");
            assert_eq!(time_h, 2.0);
            assert_eq!((first_row, second_row), (1, 2));
        }
        other => panic!("expected a duplicate observation, got {:?}", other),
    }
    Ok(())
}

#[test]
fn loaded_dataset_is_not_modified_by_derivation() -> Result<()> {
    let data = sparse()?;
    let before = data.clone();
    let _ = derive_subject_series(&data)?;
    let _ = derive_aggregate_series(&data, StdPolicy::Nan);
    assert_eq!(data, before);
    Ok(())
}
