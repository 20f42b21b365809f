use listing_lens::chart::XValue;
use listing_lens::config::DashboardConfig;
use listing_lens::controls::{Choice, ControlOptions, ControlState, RangeSelection};
use listing_lens::data::filter::{analyzable_indices, refine_indices};
use listing_lens::data::loader::read_csv;
use listing_lens::data::model::{Listing, ListingTable};
use listing_lens::state::{run_pipeline, DashboardFrame};
use proptest::prelude::*;

const HEADER: &str = "name,neighbourhood_cleansed,room_type,price,accommodates,review_scores_rating,estimated_revenue_l365d";

/// Load `rows` under the standard header and run the pipeline with the
/// default controls.
fn default_frame(rows: &[&str]) -> (ListingTable, Vec<usize>, ControlState, DashboardFrame) {
    let text = format!("{HEADER}\n{}\n", rows.join("\n"));
    let table = read_csv(text.as_bytes()).expect("fixture parses");
    let config = DashboardConfig::default();
    let base = analyzable_indices(&table);
    let options = ControlOptions::from_base(&table, &base, &config);
    let controls = ControlState::defaults(&options, &config);
    let frame = run_pipeline(&table, &base, &controls);
    (table, base, controls, frame)
}

#[test]
fn single_listing_passes_default_controls() {
    let (table, _, controls, frame) = default_frame(&["A,X,Entire home,$100.00,2,4.8,5000"]);

    assert_eq!(table.listings[0].price, Some(100.0));
    assert_eq!(controls.review_score, RangeSelection::new(3.5, 5.0));
    assert_eq!(frame.view, vec![0]);
    assert_eq!(frame.aggregate.len(), 1);
    assert_eq!(frame.aggregate[0].neighbourhood, "X");
    assert_eq!(frame.aggregate[0].room_type, "Entire home");
    assert_eq!(frame.aggregate[0].mean_revenue, 5000.0);

    let bar = &frame.charts.revenue_by_group;
    assert_eq!(bar.data.len(), 1);
    assert_eq!(bar.data[0].x, XValue::Category("X".into()));
    assert_eq!(frame.charts.review_vs_revenue.data.len(), 1);
    assert_eq!(frame.charts.accommodates_vs_revenue.data.len(), 1);
}

#[test]
fn zero_revenue_listing_is_dropped_without_error() {
    let (_, base, _, frame) = default_frame(&["A,X,Entire home,$100.00,2,4.8,0"]);

    assert!(base.is_empty());
    assert!(frame.view.is_empty());
    assert!(frame.aggregate.is_empty());
    assert!(frame.charts.in_order().iter().all(|spec| spec.is_empty()));
}

#[test]
fn same_pair_is_averaged() {
    let (_, _, _, frame) = default_frame(&[
        "A,X,Entire home,$100.00,2,4.8,4000",
        "B,X,Entire home,$120.00,3,4.6,6000",
    ]);

    assert_eq!(frame.view, vec![0, 1]);
    assert_eq!(frame.aggregate.len(), 1);
    assert_eq!(frame.aggregate[0].mean_revenue, 5000.0);
}

#[test]
fn absent_neighbourhood_gives_empty_charts() {
    let (table, base, controls, _) = default_frame(&["A,X,Entire home,$100.00,2,4.8,5000"]);
    let controls = ControlState {
        neighbourhood: Choice::Only("Y".into()),
        ..controls
    };

    let frame = run_pipeline(&table, &base, &controls);

    assert!(frame.view.is_empty());
    assert!(frame.aggregate.is_empty());
    assert!(frame.charts.revenue_by_group.is_empty());
}

#[test]
fn options_ignore_rows_the_base_filter_drops() {
    let text = format!(
        "{HEADER}\nA,X,Entire home,$100.00,2,4.8,5000\nB,Y,Private room,,1,4.0,3000\nC,Z,Shared room,$30.00,1,,2000\n"
    );
    let table = read_csv(text.as_bytes()).unwrap();
    let base = analyzable_indices(&table);
    let options = ControlOptions::from_base(&table, &base, &DashboardConfig::default());

    assert_eq!(options.neighbourhoods, vec!["X"]);
    assert_eq!(options.room_types, vec!["Entire home"]);
}

// ---------------------------------------------------------------------------
// Properties over arbitrary tables and control values
// ---------------------------------------------------------------------------

const NEIGHBOURHOODS: [&str; 3] = ["X", "Y", "Z"];
const ROOM_TYPES: [&str; 2] = ["Entire home", "Private room"];

fn arb_listing() -> impl Strategy<Value = Listing> {
    (
        0..NEIGHBOURHOODS.len(),
        0..ROOM_TYPES.len(),
        proptest::option::of(1.0f64..500.0),
        proptest::option::of(0.0f64..=5.0),
        proptest::option::of(-100.0f64..200_000.0),
    )
        .prop_map(|(n, r, price, review_score, revenue)| Listing {
            name: format!("{n}-{r}"),
            neighbourhood: NEIGHBOURHOODS[n].to_string(),
            room_type: ROOM_TYPES[r].to_string(),
            price,
            accommodates: Some(2),
            review_score,
            revenue,
            ..Listing::default()
        })
}

fn arb_choice(values: &'static [&'static str]) -> impl Strategy<Value = Choice> {
    prop_oneof![
        Just(Choice::All),
        (0..values.len()).prop_map(move |i| Choice::Only(values[i].to_string())),
        Just(Choice::Only("W".to_string())),
    ]
}

fn arb_controls() -> impl Strategy<Value = ControlState> {
    (
        arb_choice(&NEIGHBOURHOODS),
        arb_choice(&ROOM_TYPES),
        (0.0f64..=5.0, 0.0f64..=5.0),
        (0.0f64..200_000.0, 0.0f64..200_000.0),
    )
        .prop_map(|(neighbourhood, room_type, (r1, r2), (v1, v2))| ControlState {
            neighbourhood,
            room_type,
            review_score: RangeSelection::new(r1, r2),
            revenue: RangeSelection::new(v1, v2),
        })
}

proptest! {
    #[test]
    fn view_rows_satisfy_every_predicate(
        listings in proptest::collection::vec(arb_listing(), 0..40),
        controls in arb_controls(),
    ) {
        let table = ListingTable::new(Vec::new(), listings);
        let base = analyzable_indices(&table);
        let view = refine_indices(&table, &base, &controls);

        for &i in &view {
            prop_assert!(base.contains(&i));
            let listing = &table.listings[i];
            let revenue = listing.revenue.unwrap();
            let review = listing.review_score.unwrap();
            prop_assert!(listing.price.is_some());
            prop_assert!(revenue > 0.0);
            prop_assert!(controls.revenue.contains(revenue));
            prop_assert!(controls.review_score.contains(review));
            prop_assert!(controls.neighbourhood.admits(&listing.neighbourhood));
            prop_assert!(controls.room_type.admits(&listing.room_type));
        }
    }

    #[test]
    fn refinement_is_deterministic(
        listings in proptest::collection::vec(arb_listing(), 0..40),
        controls in arb_controls(),
    ) {
        let table = ListingTable::new(Vec::new(), listings);
        let base = analyzable_indices(&table);

        prop_assert_eq!(
            run_pipeline(&table, &base, &controls),
            run_pipeline(&table, &base, &controls)
        );
    }

    #[test]
    fn aggregate_has_one_row_per_pair_in_view(
        listings in proptest::collection::vec(arb_listing(), 0..40),
        controls in arb_controls(),
    ) {
        let table = ListingTable::new(Vec::new(), listings);
        let base = analyzable_indices(&table);
        let frame = run_pipeline(&table, &base, &controls);

        let pairs: std::collections::BTreeSet<(&str, &str)> = frame
            .view
            .iter()
            .map(|&i| {
                let l = &table.listings[i];
                (l.neighbourhood.as_str(), l.room_type.as_str())
            })
            .collect();
        prop_assert_eq!(frame.aggregate.len(), pairs.len());

        let counted: usize = frame.aggregate.iter().map(|g| g.count).sum();
        prop_assert_eq!(counted, frame.view.len());
    }
}
