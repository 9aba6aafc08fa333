//! Viewport math and response decoding checked through the public API

use geocomplete::geocoding::mapbox::parse_forward_response;
use geocomplete::{
    fit_bounds, BoundingBox, FitBoundsOptions, GeocodeResult, GeocoderConfig, SelectionResolver,
    Viewport, WebMercatorViewport,
};

#[test]
fn test_bigger_box_never_zooms_in_further() {
    let options = FitBoundsOptions::default();
    let mut previous = f64::INFINITY;
    for half in [0.01, 0.1, 1.0, 5.0, 20.0, 60.0] {
        let bbox = BoundingBox::new(10.0 - half, 45.0 - half / 2.0, 10.0 + half, 45.0 + half / 2.0);
        let fitted = fit_bounds(800.0, 600.0, &bbox, options);
        assert!(
            fitted.zoom <= previous,
            "zoom {} for half-width {} exceeds {}",
            fitted.zoom,
            half,
            previous
        );
        previous = fitted.zoom;
    }
}

#[test]
fn test_symmetric_box_centres_on_origin() {
    let bbox = BoundingBox::new(-10.0, -5.0, 10.0, 5.0);
    let a = fit_bounds(800.0, 600.0, &bbox, FitBoundsOptions::default());
    let b = fit_bounds(800.0, 600.0, &bbox, FitBoundsOptions::default());

    assert!(a.longitude.abs() < 1e-9);
    assert!(a.latitude.abs() < 1e-9);
    assert_eq!(a, b);
    // Width-bound: 20 degrees of 360 across 800 px of 512 px tiles
    let expected = (800.0_f64 / (512.0 * 20.0 / 360.0)).log2();
    assert!((a.zoom - expected).abs() < 1e-9);
}

#[test]
fn test_fitted_view_contains_the_box() {
    let bbox = BoundingBox::new(2.22, 48.81, 2.47, 48.90);
    let item = GeocodeResult::point("Paris", 2.35, 48.85).with_bbox(bbox);
    let resolver = SelectionResolver::from_config(&GeocoderConfig::new("t"));
    let viewport = resolver.resolve(&Viewport::default(), &item);

    let visible = WebMercatorViewport::new(viewport).bounds();
    assert!(visible.west <= bbox.west + 1e-9);
    assert!(visible.east >= bbox.east - 1e-9);
    assert!(visible.south <= bbox.south + 1e-9);
    assert!(visible.north >= bbox.north - 1e-9);
}

#[test]
fn test_padding_zooms_out() {
    let bbox = BoundingBox::new(-1.0, -1.0, 1.0, 1.0);
    let tight = fit_bounds(800.0, 600.0, &bbox, FitBoundsOptions::default());
    let padded = fit_bounds(
        800.0,
        600.0,
        &bbox,
        FitBoundsOptions {
            padding: 50.0,
            ..FitBoundsOptions::default()
        },
    );
    assert!(padded.zoom < tight.zoom);
}

#[test]
fn test_response_without_features_is_empty() {
    assert!(parse_forward_response("{}").unwrap().is_empty());
    assert!(parse_forward_response(r#"{"type":"FeatureCollection","query":["x"]}"#)
        .unwrap()
        .is_empty());
    assert!(parse_forward_response("not json").is_err());
}

#[test]
fn test_mapbox_feature_collection_is_decoded() {
    let body = r#"{
        "type": "FeatureCollection",
        "query": ["paris"],
        "features": [
            {
                "id": "place.123",
                "type": "Feature",
                "place_type": ["place"],
                "relevance": 1,
                "text": "Paris",
                "place_name": "Paris, France",
                "bbox": [2.224122, 48.8155755, 2.4697602, 48.902156],
                "center": [2.35183, 48.85658],
                "geometry": {"type": "Point", "coordinates": [2.35183, 48.85658]}
            },
            {
                "id": "poi.456",
                "type": "Feature",
                "place_type": ["poi"],
                "text": "Paris Baguette",
                "place_name": "Paris Baguette, 1 Main St",
                "center": [-73.99, 40.73]
            }
        ],
        "attribution": "NOTICE"
    }"#;

    let results = parse_forward_response(body).unwrap();
    assert_eq!(results.len(), 2);

    let paris = &results[0];
    assert_eq!(paris.place_name, "Paris, France");
    assert_eq!(paris.id.as_deref(), Some("place.123"));
    assert_eq!(paris.place_type, vec!["place".to_string()]);
    assert_eq!(paris.relevance, Some(1.0));
    assert_eq!(
        paris.bbox,
        Some(BoundingBox::new(2.224122, 48.8155755, 2.4697602, 48.902156))
    );

    assert!(results[1].bbox.is_none());
    assert_eq!(results[1].longitude(), -73.99);
}
