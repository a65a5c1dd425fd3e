//! Flight roster CSV import through the public crate API.

use std::io::Write;

use concourse_sim::roster::{find_flight_csv, flight_csv_candidate_paths, load_flights_from_csv};

#[test]
fn a_well_formed_roster_loads_every_row() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "flight_number,departure_time,seats,fill_percent,shape_tag").unwrap();
    writeln!(file, "XY789,06:45,200,0.85,widebody").unwrap();
    writeln!(file, "ZZ001,23:59,90,1.0,narrowbody").unwrap();

    let flights = load_flights_from_csv(file.path()).unwrap();
    assert_eq!(flights.len(), 2);
    assert_eq!(flights[0].departure_time, 6 * 60 + 45);
    assert_eq!(flights[1].departure_time, 23 * 60 + 59);
}

#[test]
fn a_row_with_non_finite_fill_percent_is_skipped_not_fatal() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "flight_number,departure_time,seats,fill_percent,shape_tag").unwrap();
    writeln!(file, "AB1,10:00,100,NaN,narrowbody").unwrap();
    writeln!(file, "AB2,11:00,100,0.5,narrowbody").unwrap();

    let flights = load_flights_from_csv(file.path()).unwrap();
    assert_eq!(flights.len(), 1);
    assert_eq!(flights[0].flight_number(), "AB2");
}

#[test]
fn candidate_paths_include_the_app_data_dir_when_given() {
    let dir = tempfile::tempdir().unwrap();
    let candidates = flight_csv_candidate_paths(Some(dir.path()));
    assert_eq!(candidates.len(), 2);
    assert_eq!(candidates[1], dir.path().join("flights.csv"));
}

#[test]
fn find_flight_csv_returns_none_when_neither_candidate_exists() {
    let dir = tempfile::tempdir().unwrap();
    assert!(find_flight_csv(Some(dir.path())).is_none());
}
