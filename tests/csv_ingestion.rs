use ev_registration_analytics::IngestionError;
use ev_registration_analytics::ingestion::csv::{ingest_csv_from_path, ingest_csv_from_reader};
use ev_registration_analytics::types::{CafvEligibility, EvType};

const HEADER: &str = "VIN (1-10),County,City,State,Model Year,Make,Model,Electric Vehicle Type,\
Clean Alternative Fuel Vehicle (CAFV) Eligibility,Electric Range,Base MSRP,DOL Vehicle ID";

fn reader(input: &str) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(input.as_bytes())
}

#[test]
fn ingest_csv_from_path_happy_path() {
    let ds = ingest_csv_from_path("tests/fixtures/vehicles.csv").unwrap();

    assert_eq!(ds.len(), 6);
    let first = &ds.records()[0];
    assert_eq!(first.id, "EV000000");
    assert_eq!(first.vin, "5YJ3E1EA8J");
    assert_eq!(first.county, "King");
    assert_eq!(first.model_year, 2018);
    assert_eq!(first.make, "TESLA");
    assert_eq!(first.model, "MODEL 3");
    assert_eq!(first.ev_type, EvType::Bev);
    assert_eq!(first.cafv_eligibility, CafvEligibility::Eligible);
    assert_eq!(first.electric_range, 215);
    assert_eq!(first.census_tract, "53033007800");
    assert_eq!(first.electric_utility, "CITY OF SEATTLE - (WA)|CITY OF TACOMA - (WA)");

    assert_eq!(ds.records()[5].id, "EV000005");
    assert_eq!(ds.records()[2].ev_type, EvType::Phev);
}

#[test]
fn ingest_csv_reads_blank_range_and_msrp_as_zero() {
    let ds = ingest_csv_from_path("tests/fixtures/vehicles.csv").unwrap();
    let model_y = &ds.records()[3];
    assert_eq!(model_y.model, "MODEL Y");
    assert_eq!(model_y.electric_range, 0);
    assert_eq!(model_y.base_msrp, 0);
}

#[test]
fn ingest_csv_allows_reordered_columns_and_explicit_ids() {
    let input = "\
Make,ID,Model,Model Year,County,City,State,VIN (1-10),Electric Vehicle Type,\
Clean Alternative Fuel Vehicle (CAFV) Eligibility,Electric Range,Base MSRP,DOL Vehicle ID
NISSAN,WA-17,LEAF,2013,King,Bellevue,WA,1N4AZ0CP5D,Battery Electric Vehicle (BEV),\
Clean Alternative Fuel Vehicle Eligible,75,0,100431765
";
    let ds = ingest_csv_from_reader(&mut reader(input)).unwrap();
    assert_eq!(ds.len(), 1);
    let record = &ds.records()[0];
    assert_eq!(record.id, "WA-17");
    assert_eq!(record.make, "NISSAN");
    assert_eq!(record.vin, "1N4AZ0CP5D");
    assert_eq!(record.postal_code, "");
}

#[test]
fn ingest_csv_errors_on_missing_required_column() {
    let input = "VIN (1-10),County,City,State,Model Year,Make,Model\n5YJ3E1EA8J,King,Seattle,WA,2018,TESLA,MODEL 3\n";

    let err = ingest_csv_from_reader(&mut reader(input)).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("schema mismatch"));
    assert!(msg.contains("missing required column 'Electric Vehicle Type'"));
}

#[test]
fn ingest_csv_errors_on_integer_parse() {
    let input = format!(
        "{HEADER}\n5YJ3E1EA8J,King,Seattle,WA,2018,TESLA,MODEL 3,Battery Electric Vehicle (BEV),\
Clean Alternative Fuel Vehicle Eligible,far,0,474111233\n"
    );

    let err = ingest_csv_from_reader(&mut reader(&input)).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("failed to parse value"));
    assert!(msg.contains("column 'Electric Range'"));
    assert!(matches!(err, IngestionError::ParseError { row: 2, .. }));
}

#[test]
fn ingest_csv_errors_on_unknown_vehicle_type() {
    let input = format!(
        "{HEADER}\n5YJ3E1EA8J,King,Seattle,WA,2018,TESLA,MODEL 3,BEV,\
Clean Alternative Fuel Vehicle Eligible,215,0,474111233\n"
    );

    let err = ingest_csv_from_reader(&mut reader(&input)).unwrap_err();
    match err {
        IngestionError::ParseError { column, raw, .. } => {
            assert_eq!(column, "Electric Vehicle Type");
            assert_eq!(raw, "BEV");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn ingest_csv_errors_on_missing_model_year() {
    let input = format!(
        "{HEADER}\n5YJ3E1EA8J,King,Seattle,WA,,TESLA,MODEL 3,Battery Electric Vehicle (BEV),\
Clean Alternative Fuel Vehicle Eligible,215,0,474111233\n"
    );

    let err = ingest_csv_from_reader(&mut reader(&input)).unwrap_err();
    assert!(err.to_string().contains("missing model year"));
}

#[test]
fn ingest_csv_with_only_headers_is_empty() {
    let ds = ingest_csv_from_reader(&mut reader(&format!("{HEADER}\n"))).unwrap();
    assert!(ds.is_empty());
}
