// Host-side tests for the signal adapters, driven directly without a
// controller.

mod support;

use glam::Vec2;
use kinesis_core::adapters::proximity::proximity_transform;
use kinesis_core::adapters::{
    AudioAdapter, DepthAdapter, PathAdapter, PointerAdapter, ProximityAdapter, ScrollAdapter,
};
use kinesis_core::config::{attrs, markers, ContainerConfig, ProximityConfig};
use kinesis_core::signal::Proximity;
use kinesis_core::transform::TransformOp;
use kinesis_core::{Adapter, ConstructionError, Cx, InputEvent, ManualScheduler, Mount, Node, Rect};
use support::{approx, attributes, FakeSpectrum, FakeSurface, FixedLength};

const CONTAINER: Rect = Rect {
    left: 0.0,
    top: 0.0,
    width: 200.0,
    height: 100.0,
};

fn send<A: Adapter>(adapter: &mut A, event: InputEvent, surface: &mut FakeSurface) {
    let mut scheduler = ManualScheduler::new();
    let mut cx = Cx {
        surface,
        scheduler: &mut scheduler,
    };
    adapter.input(event, &mut cx);
}

fn frame<A: Adapter>(adapter: &mut A, surface: &mut FakeSurface) {
    let mut scheduler = ManualScheduler::new();
    let mut cx = Cx {
        surface,
        scheduler: &mut scheduler,
    };
    adapter.frame(&mut cx);
}

// --- pointer ---

#[test]
fn pointer_mount_styles_container_and_children() {
    let container = attributes(&[(markers::TRANSFORMER, "")]);
    let child = attributes(&[
        (markers::TRANSFORMER_ELEMENT, ""),
        (attrs::TRANSFORM_ORIGIN, "top left"),
    ]);
    let mut adapter =
        PointerAdapter::new(Mount::new(&container, ""), vec![Mount::new(&child, "")]).unwrap();
    let mut surface = FakeSurface::new(CONTAINER);
    adapter.mount(&mut surface);

    assert_eq!(surface.property(Node::Container, "perspective"), Some("1000px"));
    assert_eq!(
        surface.property(Node::Container, "transform-style"),
        Some("preserve-3d")
    );
    assert_eq!(
        surface.property(Node::Child(0), "transition"),
        Some("transform 1000ms cubic-bezier(0.23, 1, 0.32, 1)")
    );
    assert_eq!(
        surface.property(Node::Child(0), "transform-origin"),
        Some("top left")
    );
    assert_eq!(surface.transform(Node::Child(0)), None);
}

#[test]
fn pointer_follows_moves_and_resets_on_leave() {
    let container = attributes(&[(markers::TRANSFORMER, "")]);
    let child = attributes(&[(markers::TRANSFORMER_ELEMENT, "")]);
    let mut adapter = PointerAdapter::new(
        Mount::new(&container, ""),
        vec![Mount::new(&child, "rotate(10deg)")],
    )
    .unwrap();
    let mut surface = FakeSurface::new(CONTAINER);

    send(&mut adapter, InputEvent::PointerEnter, &mut surface);
    assert!(adapter.is_pointer_inside());
    send(&mut adapter, InputEvent::PointerMove(Vec2::new(150.0, 75.0)), &mut surface);
    assert_eq!(
        surface.transform(Node::Child(0)),
        Some("rotate(10deg) translate3d(5px, 5px, 0px)")
    );

    send(&mut adapter, InputEvent::PointerMove(Vec2::new(100.0, 50.0)), &mut surface);
    assert_eq!(
        surface.transform(Node::Child(0)),
        Some("rotate(10deg) translate3d(0px, 0px, 0px)")
    );

    send(&mut adapter, InputEvent::PointerLeave, &mut surface);
    assert_eq!(surface.transform(Node::Child(0)), Some("rotate(10deg)"));
    assert!(!adapter.is_pointer_inside());
}

#[test]
fn pointer_move_without_enter_counts_as_inside() {
    let container = attributes(&[(markers::TRANSFORMER, "")]);
    let child = attributes(&[(markers::TRANSFORMER_ELEMENT, "")]);
    let mut adapter =
        PointerAdapter::new(Mount::new(&container, ""), vec![Mount::new(&child, "")]).unwrap();
    let mut surface = FakeSurface::new(CONTAINER);

    send(&mut adapter, InputEvent::PointerMove(Vec2::new(200.0, 100.0)), &mut surface);
    assert!(adapter.is_pointer_inside());
    assert_eq!(
        surface.transform(Node::Child(0)),
        Some("translate3d(10px, 10px, 0px)")
    );
}

#[test]
fn repeated_identical_moves_write_once() {
    let container = attributes(&[(markers::TRANSFORMER, "")]);
    let child = attributes(&[(markers::TRANSFORMER_ELEMENT, "")]);
    let mut adapter =
        PointerAdapter::new(Mount::new(&container, ""), vec![Mount::new(&child, "")]).unwrap();
    let mut surface = FakeSurface::new(CONTAINER);
    send(&mut adapter, InputEvent::PointerEnter, &mut surface);
    for _ in 0..3 {
        send(&mut adapter, InputEvent::PointerMove(Vec2::new(20.0, 30.0)), &mut surface);
    }
    assert_eq!(surface.transform_writes, 1);
}

#[test]
fn interaction_axis_constrains_pointer_input() {
    let container = attributes(&[(markers::TRANSFORMER, "")]);
    let child = attributes(&[
        (markers::TRANSFORMER_ELEMENT, ""),
        (attrs::AXIS, "x, y, z"),
        (attrs::INTERACTION_AXIS, "x"),
    ]);
    let mut adapter =
        PointerAdapter::new(Mount::new(&container, ""), vec![Mount::new(&child, "")]).unwrap();
    let mut surface = FakeSurface::new(CONTAINER);
    send(&mut adapter, InputEvent::PointerEnter, &mut surface);
    send(&mut adapter, InputEvent::PointerMove(Vec2::new(150.0, 75.0)), &mut surface);
    assert_eq!(
        surface.transform(Node::Child(0)),
        Some("translate3d(5px, 0px, 10px)")
    );
}

#[test]
fn missing_markers_are_rejected() {
    let bare = attributes(&[]);
    let container = attributes(&[(markers::TRANSFORMER, "")]);
    assert_eq!(
        PointerAdapter::new(Mount::new(&bare, ""), Vec::new()).err(),
        Some(ConstructionError::MissingMarker(markers::TRANSFORMER))
    );
    assert_eq!(
        PointerAdapter::new(Mount::new(&container, ""), vec![Mount::new(&bare, "")]).err(),
        Some(ConstructionError::MissingMarker(markers::TRANSFORMER_ELEMENT))
    );
}

// --- scroll ---

#[test]
fn scroll_progress_drives_both_components() {
    let container = attributes(&[(markers::TRANSFORMER, ""), (attrs::INTERACTION, "scroll")]);
    let child = attributes(&[(markers::TRANSFORMER_ELEMENT, "")]);
    let mut adapter =
        ScrollAdapter::new(Mount::new(&container, ""), vec![Mount::new(&child, "")]).unwrap();
    let mut surface = FakeSurface::new(Rect::new(0.0, 300.0, 100.0, 200.0));

    send(&mut adapter, InputEvent::Scroll, &mut surface);
    assert_eq!(adapter.progress(), 0.5);
    assert_eq!(
        surface.transform(Node::Child(0)),
        Some("translate3d(5px, 5px, 0px)")
    );

    surface.rects.insert(Node::Container, Rect::new(0.0, 800.0, 100.0, 200.0));
    send(&mut adapter, InputEvent::Scroll, &mut surface);
    assert_eq!(adapter.progress(), 0.0);
}

#[test]
fn standalone_scroll_item_moves_itself() {
    let item = attributes(&[
        (markers::SCROLL_ITEM, ""),
        (attrs::TRANSFORM, "rotate"),
        (attrs::STRENGTH, "20"),
    ]);
    let mut adapter = ScrollAdapter::standalone(Mount::new(&item, "")).unwrap();
    assert_eq!(adapter.elements().len(), 1);
    let mut surface = FakeSurface::new(Rect::new(0.0, 300.0, 100.0, 200.0));
    send(&mut adapter, InputEvent::Scroll, &mut surface);
    assert_eq!(
        surface.transform(Node::Child(0)),
        Some("rotate3d(0, 0, 1, 20deg)")
    );
}

// --- audio ---

fn audio_adapter(
    container: &support::Attrs,
    children: &[support::Attrs],
    spectrum: &FakeSpectrum,
) -> AudioAdapter {
    let children = children.iter().map(|c| Mount::new(c, "")).collect();
    AudioAdapter::new(
        Mount::new(container, ""),
        children,
        Box::new(spectrum.clone()),
    )
    .unwrap()
}

#[test]
fn audio_requires_source() {
    let container = attributes(&[(markers::AUDIO, "")]);
    let result = AudioAdapter::new(
        Mount::new(&container, ""),
        Vec::new(),
        Box::new(FakeSpectrum::with_bins(8)),
    );
    assert_eq!(result.err(), Some(ConstructionError::MissingAudioSource));
}

#[test]
fn audio_autoplay_starts_playback() {
    let container = attributes(&[
        (markers::AUDIO, ""),
        (attrs::AUDIO, "song.mp3"),
        (attrs::PLAY_AUDIO, "true"),
    ]);
    let spectrum = FakeSpectrum::with_bins(8);
    let adapter = audio_adapter(&container, &[], &spectrum);
    assert!(adapter.is_playing());
    assert!(adapter.wants_frames());
    assert!(spectrum.is_playing());
}

#[test]
fn audio_frames_smooth_bins_and_pick_transition_tiers() {
    let container = attributes(&[(markers::AUDIO, ""), (attrs::AUDIO, "song.mp3")]);
    let child = attributes(&[(markers::AUDIO_ELEMENT, ""), (attrs::AUDIO_INDEX, "3")]);
    let spectrum = FakeSpectrum::with_bins(64);
    let mut adapter = audio_adapter(&container, &[child], &spectrum);
    let mut surface = FakeSurface::new(CONTAINER);
    adapter.mount(&mut surface);
    assert_eq!(
        surface.property(Node::Child(0), "transition"),
        Some("transform var(--transform-duration) ease-out")
    );

    frame(&mut adapter, &mut surface);
    assert_eq!(surface.transform(Node::Child(0)), None, "not playing yet");

    adapter.play();
    spectrum.set_bin(3, 255);
    frame(&mut adapter, &mut surface);
    assert!(approx(adapter.smoothed()[3], 51.0));
    assert_eq!(
        surface.property(Node::Child(0), "--transform-duration"),
        Some("0.05s")
    );
    assert!(surface
        .transform(Node::Child(0))
        .is_some_and(|t| t.starts_with("translate3d(")));

    spectrum.fill(0);
    frame(&mut adapter, &mut surface);
    assert_eq!(
        surface.property(Node::Child(0), "--transform-duration"),
        Some("0.3s")
    );
}

#[test]
fn audio_bins_past_the_spectrum_read_zero() {
    let container = attributes(&[(markers::AUDIO, ""), (attrs::AUDIO, "song.mp3")]);
    let child = attributes(&[(markers::AUDIO_ELEMENT, ""), (attrs::AUDIO_INDEX, "500")]);
    let spectrum = FakeSpectrum::with_bins(64);
    spectrum.fill(255);
    let mut adapter = audio_adapter(&container, &[child], &spectrum);
    let mut surface = FakeSurface::new(CONTAINER);
    adapter.play();
    frame(&mut adapter, &mut surface);
    assert_eq!(
        surface.transform(Node::Child(0)),
        Some("translate3d(0px, 0px, 0px)")
    );
}

#[test]
fn audio_stop_rewinds_clears_and_resets() {
    let container = attributes(&[(markers::AUDIO, ""), (attrs::AUDIO, "song.mp3")]);
    let child = attributes(&[(markers::AUDIO_ELEMENT, ""), (attrs::AUDIO_INDEX, "0")]);
    let spectrum = FakeSpectrum::with_bins(4);
    spectrum.fill(200);
    let mut adapter = AudioAdapter::new(
        Mount::new(&container, ""),
        vec![Mount::new(&child, "scale(2)")],
        Box::new(spectrum.clone()),
    )
    .unwrap();
    let mut surface = FakeSurface::new(CONTAINER);
    adapter.play();
    frame(&mut adapter, &mut surface);
    assert!(adapter.smoothed()[0] > 0.0);

    adapter.stop(&mut surface);
    assert!(!adapter.is_playing());
    assert!(!spectrum.is_playing());
    assert_eq!(spectrum.0.borrow().rewinds, 1);
    assert!(adapter.smoothed().iter().all(|v| *v == 0.0));
    assert_eq!(surface.transform(Node::Child(0)), Some("scale(2)"));
    assert_eq!(
        surface.property(Node::Child(0), "--transform-duration"),
        Some("0.5s")
    );
}

#[test]
fn audio_source_change_swaps_source_and_clears_history() {
    let container = attributes(&[(markers::AUDIO, ""), (attrs::AUDIO, "a.mp3")]);
    let spectrum = FakeSpectrum::with_bins(2);
    spectrum.fill(100);
    let mut adapter = audio_adapter(&container, &[], &spectrum);
    let mut surface = FakeSurface::new(CONTAINER);
    adapter.play();
    frame(&mut adapter, &mut surface);
    assert!(adapter.smoothed()[0] > 0.0);

    let changed = attributes(&[(markers::AUDIO, ""), (attrs::AUDIO, "b.mp3")]);
    let config = AudioAdapter::read_config(&changed, &[]).unwrap();
    adapter.reconfigure(config, &mut surface);
    assert_eq!(adapter.source(), "b.mp3");
    assert_eq!(spectrum.0.borrow().source.as_deref(), Some("b.mp3"));
    assert!(adapter.smoothed().iter().all(|v| *v == 0.0));
}

// --- proximity ---

fn proximity(pairs: &[(&'static str, &'static str)]) -> ProximityConfig {
    let mut all = vec![(markers::DISTANCE_ITEM, "")];
    all.extend_from_slice(pairs);
    ProximityConfig::from_attributes(&attributes(&all))
}

#[test]
fn attraction_sticks_inside_threshold() {
    let config = proximity(&[(attrs::INTERACTION, "attraction")]);
    let item = Rect::new(50.0, 50.0, 100.0, 100.0);
    let signal = Proximity::measure(Vec2::new(103.0, 100.0), &item);
    assert_eq!(
        proximity_transform(&config, "", &signal).to_css(),
        "translate(3px, 0px)"
    );
}

#[test]
fn linear_and_repulsion_translate_scale_with_distance() {
    let item = Rect::new(50.0, 50.0, 100.0, 100.0);
    let signal = Proximity::measure(Vec2::new(150.0, 100.0), &item);
    let linear = proximity(&[]);
    assert_eq!(
        proximity_transform(&linear, "", &signal).to_css(),
        "translate(10px, 0px)"
    );
    let repulsion = proximity(&[(attrs::INTERACTION, "repulsion")]);
    assert_eq!(
        proximity_transform(&repulsion, "", &signal).to_css(),
        "translate(-10px, 0px)"
    );
}

#[test]
fn outside_the_radius_returns_to_baseline() {
    let item = Rect::new(50.0, 50.0, 100.0, 100.0);
    let signal = Proximity::measure(Vec2::new(400.0, 100.0), &item);
    for style in ["linear", "attraction", "repulsion"] {
        let config = proximity(&[(attrs::INTERACTION, style)]);
        assert_eq!(
            proximity_transform(&config, "rotate(5deg)", &signal).to_css(),
            "rotate(5deg)"
        );
    }
}

#[test]
fn proximity_rotation_blends_toward_pointer() {
    let item = Rect::new(50.0, 50.0, 100.0, 100.0);
    // straight below the center: 90 degrees
    let signal = Proximity::measure(Vec2::new(100.0, 150.0), &item);
    let angle = |style| {
        let config = proximity(&[(attrs::TRANSFORM, "rotate"), (attrs::INTERACTION, style)]);
        match proximity_transform(&config, "", &signal).ops[0] {
            TransformOp::Rotate(a) => a,
            other => panic!("unexpected op {other:?}"),
        }
    };
    assert!(approx(angle("linear"), 45.0));
    assert!(approx(angle("repulsion"), -45.0));
}

#[test]
fn proximity_scale_grows_or_shrinks() {
    let item = Rect::new(50.0, 50.0, 100.0, 100.0);
    let signal = Proximity::measure(Vec2::new(150.0, 100.0), &item);
    let scale = |style| {
        let config = proximity(&[(attrs::TRANSFORM, "scale"), (attrs::INTERACTION, style)]);
        match proximity_transform(&config, "", &signal).ops[0] {
            TransformOp::Scale(s) => s,
            other => panic!("unexpected op {other:?}"),
        }
    };
    assert!(approx(scale("attraction"), 1.1));
    assert!(approx(scale("repulsion"), 0.9));
}

#[test]
fn proximity_adapter_measures_each_frame() {
    let item = attributes(&[(markers::DISTANCE_ITEM, "")]);
    let mut adapter =
        ProximityAdapter::new(ContainerConfig::default(), vec![Mount::new(&item, "")]).unwrap();
    assert!(adapter.wants_frames());
    let mut surface =
        FakeSurface::new(CONTAINER).with_child(0, Rect::new(50.0, 50.0, 100.0, 100.0));

    frame(&mut adapter, &mut surface);
    assert_eq!(surface.transform(Node::Child(0)), None, "no pointer seen yet");

    send(&mut adapter, InputEvent::PointerMove(Vec2::new(150.0, 100.0)), &mut surface);
    assert_eq!(adapter.pointer(), Some(Vec2::new(150.0, 100.0)));
    frame(&mut adapter, &mut surface);
    assert_eq!(surface.transform(Node::Child(0)), Some("translate(10px, 0px)"));

    // the element moved under a still pointer
    surface
        .rects
        .insert(Node::Child(0), Rect::new(100.0, 50.0, 100.0, 100.0));
    frame(&mut adapter, &mut surface);
    assert_eq!(surface.transform(Node::Child(0)), Some("translate(0px, 0px)"));
}

#[test]
fn proximity_items_need_their_marker() {
    let bare = attributes(&[]);
    assert_eq!(
        ProximityAdapter::new(ContainerConfig::default(), vec![Mount::new(&bare, "")]).err(),
        Some(ConstructionError::MissingMarker(markers::DISTANCE_ITEM))
    );
}

// --- path ---

#[test]
fn path_needs_a_descriptor_somewhere() {
    let container = attributes(&[(markers::PATH, "")]);
    let child = attributes(&[(markers::PATH_ELEMENT, "")]);
    assert_eq!(
        PathAdapter::new(Mount::new(&container, ""), Vec::new(), Box::new(FixedLength(1.0))).err(),
        Some(ConstructionError::MissingPathDescriptor)
    );
    assert_eq!(
        PathAdapter::new(
            Mount::new(&container, ""),
            vec![Mount::new(&child, "")],
            Box::new(FixedLength(1.0))
        )
        .err(),
        Some(ConstructionError::MissingPathDescriptor)
    );

    let own = attributes(&[(markers::PATH_ELEMENT, ""), (attrs::PATH, "M0 0 L5 5")]);
    assert!(PathAdapter::new(
        Mount::new(&container, ""),
        vec![Mount::new(&own, "")],
        Box::new(FixedLength(1.0))
    )
    .is_ok());
}

#[test]
fn path_mount_writes_offset_styles() {
    let container = attributes(&[(markers::PATH, ""), (attrs::PATH, "M0 0 L100 0")]);
    let child = attributes(&[(markers::PATH_ELEMENT, ""), (attrs::OFFSET, "25")]);
    let mut adapter = PathAdapter::new(
        Mount::new(&container, ""),
        vec![Mount::new(&child, "")],
        Box::new(FixedLength(400.0)),
    )
    .unwrap();
    let mut surface = FakeSurface::new(CONTAINER);
    adapter.mount(&mut surface);
    assert_eq!(
        surface.property(Node::Child(0), "offset-path"),
        Some("path('M0 0 L100 0')")
    );
    assert_eq!(surface.property(Node::Child(0), "offset-distance"), Some("25%"));
    assert_eq!(
        surface.property(Node::Child(0), "transition"),
        Some("offset-distance 1000ms ease")
    );
    assert_eq!(adapter.distance_along(0), Some(100.0));
}

#[test]
fn path_follows_horizontal_pointer_progress() {
    let container = attributes(&[(markers::PATH, ""), (attrs::PATH, "M0 0 L100 0")]);
    let child = attributes(&[(markers::PATH_ELEMENT, "")]);
    let mut adapter = PathAdapter::new(
        Mount::new(&container, ""),
        vec![Mount::new(&child, "")],
        Box::new(FixedLength(100.0)),
    )
    .unwrap();
    let mut surface = FakeSurface::new(CONTAINER);
    send(&mut adapter, InputEvent::PointerMove(Vec2::new(150.0, 10.0)), &mut surface);
    assert_eq!(adapter.position(0), Some(75.0));
    assert_eq!(surface.property(Node::Child(0), "offset-distance"), Some("75%"));
}

// --- depth ---

#[test]
fn depth_lifts_children_and_tilts_container_while_hovered() {
    let container = attributes(&[(markers::DEPTH, "")]);
    let child = attributes(&[(markers::DEPTH_ELEMENT, ""), (attrs::DEPTH, "30")]);
    let mut adapter =
        DepthAdapter::new(Mount::new(&container, ""), vec![Mount::new(&child, "")]).unwrap();
    let mut surface = FakeSurface::new(CONTAINER);
    adapter.mount(&mut surface);
    assert_eq!(surface.transform(Node::Child(0)), Some("translateZ(0px)"));
    assert_eq!(surface.property(Node::Container, "perspective"), Some("1000px"));

    send(&mut adapter, InputEvent::PointerEnter, &mut surface);
    assert!(adapter.is_hovered());
    assert_eq!(surface.transform(Node::Child(0)), Some("translateZ(30px)"));
    assert_eq!(adapter.container_transform(), None);

    send(&mut adapter, InputEvent::PointerMove(Vec2::new(200.0, 100.0)), &mut surface);
    assert_eq!(
        surface.transform(Node::Container),
        Some("rotateX(40deg) rotateY(40deg)")
    );
    assert_eq!(
        adapter.container_transform().map(|d| d.to_css()),
        Some("rotateX(40deg) rotateY(40deg)".to_string())
    );

    send(&mut adapter, InputEvent::PointerLeave, &mut surface);
    assert!(!adapter.is_hovered());
    assert_eq!(surface.transform(Node::Container), Some(""));
    assert_eq!(surface.transform(Node::Child(0)), Some("translateZ(0px)"));
}

#[test]
fn depth_move_without_enter_lifts_and_tilts() {
    let container = attributes(&[(markers::DEPTH, "")]);
    let child = attributes(&[(markers::DEPTH_ELEMENT, ""), (attrs::DEPTH, "30")]);
    let mut adapter =
        DepthAdapter::new(Mount::new(&container, ""), vec![Mount::new(&child, "")]).unwrap();
    let mut surface = FakeSurface::new(CONTAINER);
    adapter.mount(&mut surface);

    send(&mut adapter, InputEvent::PointerMove(Vec2::new(200.0, 100.0)), &mut surface);
    assert!(adapter.is_hovered());
    assert_eq!(surface.transform(Node::Child(0)), Some("translateZ(30px)"));
    assert_eq!(
        surface.transform(Node::Container),
        Some("rotateX(40deg) rotateY(40deg)")
    );
}

#[test]
fn inverted_depth_tilts_away() {
    let container = attributes(&[(markers::DEPTH, ""), (attrs::INVERTED, "true")]);
    let mut adapter = DepthAdapter::new(Mount::new(&container, "scale(1.5)"), Vec::new()).unwrap();
    let mut surface = FakeSurface::new(CONTAINER);
    send(&mut adapter, InputEvent::PointerEnter, &mut surface);
    send(&mut adapter, InputEvent::PointerMove(Vec2::new(200.0, 0.0)), &mut surface);
    assert_eq!(
        surface.transform(Node::Container),
        Some("scale(1.5) rotateX(40deg) rotateY(-40deg)")
    );
}
