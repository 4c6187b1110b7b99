// crates/tftvid-media/src/controller.rs
//
// Raw-terminal key polling thread — ported from VideoPlayer::loopControl,
// with the read loop redesigned (see DESIGN.md Open Question decision #1):
// the original blocks on getchar(), which can't observe `running` going
// false without one more keypress. This uses termios VMIN=0/VTIME=1 so a
// read times out after ~100ms and the loop reliably notices shutdown.

use std::io;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use tftvid_core::ControlState;

/// RAII guard putting stdin into non-canonical, non-echoing, 100ms-poll
/// raw mode, restoring the original terminal settings on drop — mirrors
/// `original_source`'s `TerminalRawMode` but with VMIN/VTIME set instead
/// of left at their blocking defaults.
struct RawTerminalGuard {
    orig: libc::termios,
}

impl RawTerminalGuard {
    fn new() -> io::Result<Self> {
        unsafe {
            let mut orig: libc::termios = std::mem::zeroed();
            if libc::tcgetattr(libc::STDIN_FILENO, &mut orig) != 0 {
                return Err(io::Error::last_os_error());
            }
            let mut raw = orig;
            raw.c_lflag &= !(libc::ICANON | libc::ECHO);
            raw.c_cc[libc::VMIN] = 0;
            raw.c_cc[libc::VTIME] = 1; // deciseconds: ~100ms read timeout
            if libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, &raw) != 0 {
                return Err(io::Error::last_os_error());
            }
            Ok(RawTerminalGuard { orig })
        }
    }

    fn read_byte(&self) -> Option<u8> {
        let mut byte = [0u8; 1];
        let n = unsafe { libc::read(libc::STDIN_FILENO, byte.as_mut_ptr() as *mut _, 1) };
        if n == 1 {
            Some(byte[0])
        } else {
            None
        }
    }
}

impl Drop for RawTerminalGuard {
    fn drop(&mut self) {
        unsafe {
            libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, &self.orig);
        }
    }
}

fn seek_forward(control: &ControlState, delta_us: i64, duration_us: i64) {
    control.reset_time_request.store(true, Ordering::Release);
    let current = control.current_pts_us.load(Ordering::Acquire);
    let next = (current + delta_us).clamp(0, duration_us.max(0));
    control.request_seek(next);
}

fn seek_backward(control: &ControlState, delta_us: i64, duration_us: i64) {
    control.reset_time_request.store(true, Ordering::Release);
    let current = control.current_pts_us.load(Ordering::Acquire);
    let next = (current - delta_us).clamp(0, duration_us.max(0));
    control.request_seek(next);
}

fn adjust_speed(control: &ControlState, delta: f64) {
    control.reset_time_request.store(true, Ordering::Release);
    let next = control.speed_factor() + delta;
    control.set_speed_factor(next);
    eprintln!("[control] speed: {:.1}x", control.speed_factor());
}

/// Runs the control loop until `control.running` goes false. `seek_*_us`
/// are the forward/backward seek amounts for the arrow keys (5 seconds in
/// the original); `duration_us` clamps seek targets to the stream length.
pub fn run(control: Arc<ControlState>, seek_forward_us: i64, seek_backward_us: i64, duration_us: i64) {
    let guard = match RawTerminalGuard::new() {
        Ok(g) => g,
        Err(e) => {
            eprintln!("[control] failed to enter raw terminal mode: {e}");
            return;
        }
    };

    while control.running.load(Ordering::Acquire) {
        let Some(byte) = guard.read_byte() else {
            continue; // read timed out (~100ms); loop back and recheck `running`
        };

        match byte {
            b' ' => control.toggle_paused(),
            b'[' => adjust_speed(&control, -0.1),
            b']' => adjust_speed(&control, 0.1),
            0x1b => {
                if guard.read_byte() != Some(b'[') {
                    continue;
                }
                match guard.read_byte() {
                    Some(b'C') => seek_forward(&control, seek_forward_us, duration_us),
                    Some(b'D') => seek_backward(&control, seek_backward_us, duration_us),
                    _ => {}
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seek_forward_clamps_to_duration() {
        let control = ControlState::new();
        control.current_pts_us.store(9_000_000, Ordering::Release);
        seek_forward(&control, 5_000_000, 10_000_000);
        assert_eq!(control.seek_target_us.load(Ordering::Acquire), 10_000_000);
    }

    #[test]
    fn seek_backward_clamps_to_zero() {
        let control = ControlState::new();
        control.current_pts_us.store(2_000_000, Ordering::Release);
        seek_backward(&control, 5_000_000, 10_000_000);
        assert_eq!(control.seek_target_us.load(Ordering::Acquire), 0);
    }

    #[test]
    fn adjust_speed_floors_at_one_tenth() {
        let control = ControlState::new();
        control.set_speed_factor(0.1);
        adjust_speed(&control, -0.5);
        assert_eq!(control.speed_factor(), 0.1);
    }
}
