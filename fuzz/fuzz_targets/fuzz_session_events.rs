#![no_main]

use std::time::Duration;

use arbitrary::Arbitrary;
use dndsort_core::{InputEvent, KeyCode, Point, PointerDevice};
use dndsort_sortable::bounds::{stacked, tiled};
use dndsort_sortable::{CaptureCommand, SortableConfig, SortableList};
use libfuzzer_sys::fuzz_target;
use web_time::Instant;

#[derive(Debug, Arbitrary)]
enum Op {
    Down { pointer: u8, touch: bool, target: u8, x: f32, y: f32 },
    Move { pointer: u8, x: f32, y: f32 },
    Up { pointer: u8, x: f32, y: f32 },
    Cancel { pointer: u8 },
    Key { code: u8, focused: u8 },
    Blur,
    Tick { ms: u16 },
    Replace { keep: u8 },
    ProgrammaticCancel,
}

#[derive(Debug, Arbitrary)]
struct Input {
    len: u8,
    grid: bool,
    delay_ms: u16,
    tolerance: u8,
    ops: Vec<Op>,
}

fn key(code: u8) -> KeyCode {
    match code % 10 {
        0 => KeyCode::Enter,
        1 => KeyCode::Char(' '),
        2 => KeyCode::Escape,
        3 => KeyCode::Tab,
        4 => KeyCode::Up,
        5 => KeyCode::Down,
        6 => KeyCode::Left,
        7 => KeyCode::Right,
        8 => KeyCode::Home,
        _ => KeyCode::End,
    }
}

fuzz_target!(|input: Input| {
    let len = u32::from(input.len % 24);
    let config = if input.grid {
        SortableConfig::grid(4)
    } else {
        SortableConfig::list()
    }
    .with_activation(u64::from(input.delay_ms % 500), f32::from(input.tolerance % 20));
    let Ok(mut list) = SortableList::new((0..len).collect::<Vec<u32>>(), |n| *n, config) else {
        return;
    };

    let mut now = Instant::now();
    let mut captured = 0i32;
    let device = |touch: bool| if touch { PointerDevice::Touch } else { PointerDevice::Mouse };

    for op in input.ops.into_iter().take(512) {
        let bounds = if input.grid {
            tiled(list.ids(), 4, 16.0, 2.0)
        } else {
            stacked(list.ids(), 100.0, 16.0, 2.0)
        };
        let pick = |n: u8, ids: &[u32]| ids.get(usize::from(n) % ids.len().max(1)).copied();

        let out = match op {
            Op::Down { pointer, touch, target, x, y } => list.dispatch(
                &InputEvent::pointer_down(u32::from(pointer % 3), device(touch), pick(target, list.ids()), Point::new(x, y)),
                &bounds,
                now,
            ),
            Op::Move { pointer, x, y } => list.dispatch(
                &InputEvent::pointer_move(u32::from(pointer % 3), PointerDevice::Mouse, Point::new(x, y)),
                &bounds,
                now,
            ),
            Op::Up { pointer, x, y } => list.dispatch(
                &InputEvent::pointer_up(u32::from(pointer % 3), PointerDevice::Mouse, Point::new(x, y)),
                &bounds,
                now,
            ),
            Op::Cancel { pointer } => list.dispatch(
                &InputEvent::pointer_cancel(u32::from(pointer % 3), PointerDevice::Mouse, Point::new(0.0, 0.0)),
                &bounds,
                now,
            ),
            Op::Key { code, focused } => {
                list.dispatch(&InputEvent::key(key(code), pick(focused, list.ids())), &bounds, now)
            }
            Op::Blur => list.dispatch(&InputEvent::Blur, &bounds, now),
            Op::Tick { ms } => {
                let dt = Duration::from_millis(u64::from(ms % 1000));
                now += dt;
                list.tick(now, dt, &bounds)
            }
            Op::Replace { keep } => {
                let kept: Vec<u32> = list
                    .ids()
                    .iter()
                    .copied()
                    .filter(|id| id % u32::from(keep.max(1)) != 0)
                    .collect();
                let _ = list.set_items(kept);
                continue;
            }
            Op::ProgrammaticCancel => list.cancel(),
        };

        for command in &out.capture {
            match command {
                CaptureCommand::Acquire { .. } => captured += 1,
                CaptureCommand::Release { .. } => captured -= 1,
            }
            assert!((0..=1).contains(&captured), "unbalanced capture");
        }
        assert_eq!(captured == 1, list.is_dragging());
        assert_eq!(list.items(), list.ids());
        if let Some(frame) = list.overlay_frame() {
            assert!((0.0..=1.0).contains(&frame.opacity));
        }
    }

    let out = list.teardown();
    assert_eq!(captured, out.capture.len() as i32);
    assert!(!list.is_dragging());
});
