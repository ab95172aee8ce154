use somaseg_snakes::{circle_levelset, gborders, MorphGac};
use somaseg_volume::Volume;

#[test]
fn gac_balloon_stops_on_disk_edge() {
    let _ = env_logger::builder().is_test(true).try_init();

    let img = Volume::<f32, 2>::from_shape_fn([48, 48], |[r, c]| {
        let d = ((r as f32 - 24.0).powi(2) + (c as f32 - 24.0).powi(2)).sqrt();
        if d < 12.0 {
            1.0
        } else {
            0.0
        }
    });
    let expected = img.iter().filter(|&&v| v > 0.5).count() as f32;
    let g = gborders(&img, 1000.0, 1.0).expect("valid sigma");

    let mut gac = MorphGac::new(g, 1, 0.3, 1.0).expect("2D snake");
    gac.set_levelset(&circle_levelset([48, 48], [24.0, 24.0], 5.0))
        .expect("matching shape");

    let mut counts = Vec::new();
    gac.run_with_progress(60, |_, u, _| counts.push(u.count_nonzero()))
        .expect("level set is bound");
    assert_eq!(counts.len(), 60);

    let u = gac.levelset().expect("level set is bound");
    let count = u.count_nonzero() as f32;
    assert!(
        (count - expected).abs() / expected < 0.3,
        "foreground {count} too far from disk area {expected}"
    );
    assert_eq!(u.get([24, 24]), Some(&1));
    assert_eq!(u.get([2, 2]), Some(&0));
}
