use crimemine_hotspot::{run_hotspot_clustering, HotspotParams};

// Cluster the bundled incident export into three hotspots and print where and when they are.
fn main() {
    env_logger::init();

    let table = crimemine_datasets::incidents();
    let params = HotspotParams::new(3).seed(Some(42));
    let result = run_hotspot_clustering(&table, &params).expect("hotspot analysis");

    println!("{} rows clustered", result.n_rows_used);
    for centroid in &result.centroids {
        println!(
            "hotspot {}: ({:.4}, {:.4}) around {:05.2}h on weekday {:.1}, {} incidents",
            centroid.cluster,
            centroid.latitude,
            centroid.longitude,
            centroid.decoded_hour(),
            centroid.decoded_weekday(),
            result.counts[&centroid.cluster]
        );
    }
}
