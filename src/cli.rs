//! A minimal interactive terminal driver for the kernel: step forward,
//! rewind, fast-forward, jump to an interval, and dump the current queue
//! occupancies. This stands in for the floor-plan/grid renderers and
//! playback controls the kernel itself has no opinion about — it only
//! consumes the kernel's pull-based stepping and read APIs, the way any
//! other external renderer would.

use crate::errors::Error;
use crate::kernel::Kernel;

/// Abstracts console interaction so the driver loop can be exercised
/// without a real terminal.
pub trait Interaction {
    fn clear_screen(&self) -> Result<(), Error>;
    fn write_str(&self, s: &str) -> Result<(), Error>;
    fn read_char(&self) -> Result<char, Error>;
}

pub struct ConsoleInteraction {
    term: console::Term,
}

impl ConsoleInteraction {
    pub fn new() -> Self {
        Self {
            term: console::Term::stdout(),
        }
    }
}

impl Default for ConsoleInteraction {
    fn default() -> Self {
        Self::new()
    }
}

impl Interaction for ConsoleInteraction {
    fn clear_screen(&self) -> Result<(), Error> {
        self.term.clear_screen()?;
        Ok(())
    }

    fn write_str(&self, s: &str) -> Result<(), Error> {
        self.term.write_str(s)?;
        Ok(())
    }

    fn read_char(&self) -> Result<char, Error> {
        self.term.read_char().map_err(Error::from)
    }
}

/// Runs the interactive step/rewind/dump loop until the user quits.
pub fn console_main<I: Interaction>(kernel: &mut Kernel, interaction: &I) -> Result<(), Error> {
    interaction.clear_screen()?;

    loop {
        interaction.write_str(&format!(
            "\nconcourse-sim — {}\n\
             interval {} / {} (max computed: {})\n\
             --------------------------------------------------\n\
             n. Step forward   p. Rewind one interval\n\
             f. Fast-forward   r. Run all remaining intervals\n\
             j. Jump to interval   d. Dump queue occupancies\n\
             q. Quit\n\
             Enter your choice: ",
            kernel.describe(),
            kernel.current_interval(),
            kernel.total_intervals(),
            kernel.max_computed_interval(),
        ))?;

        let input = match interaction.read_char() {
            Ok(c) => c,
            Err(e) => {
                log::error!("failed to read input: {e}");
                continue;
            }
        };
        interaction.clear_screen()?;

        match input {
            'n' => kernel.compute_next_interval(),
            'p' => kernel.rewind_one_interval(),
            'f' => kernel.fast_forward_one_interval(),
            'r' => kernel.run_all_intervals(),
            'j' => prompt_and_jump(kernel, interaction)?,
            'd' => dump_queues(kernel, interaction)?,
            'q' => {
                log::info!("quitting");
                return Ok(());
            }
            _ => interaction.write_str("invalid input\n")?,
        }
    }
}

fn prompt_and_jump<I: Interaction>(kernel: &mut Kernel, interaction: &I) -> Result<(), Error> {
    interaction.write_str("jump to interval (clamped to what's been computed): ")?;
    let mut digits = String::new();
    loop {
        let c = interaction.read_char()?;
        if c == '\n' || c == '\r' {
            break;
        }
        digits.push(c);
    }
    match digits.trim().parse::<u64>() {
        Ok(k) => kernel.go_to_interval(k),
        Err(_) => interaction.write_str("not a number\n")?,
    }
    Ok(())
}

fn dump_queues<I: Interaction>(kernel: &Kernel, interaction: &I) -> Result<(), Error> {
    for c in 0..kernel.ticket_lane_count() {
        interaction.write_str(&format!(
            "ticket lane {c}: queue={} staging={} debt={:.2}\n",
            kernel.ticket_queue(c).len(),
            kernel.ticket_staging(c).len(),
            kernel.ticket_debt(c),
        ))?;
    }
    for c in 0..kernel.checkpoint_lane_count() {
        interaction.write_str(&format!(
            "checkpoint lane {c}: queue={} staging={} serving={:?}\n",
            kernel.checkpoint_queue(c).len(),
            kernel.checkpoint_staging(c).len(),
            kernel.checkpoint_serving(c),
        ))?;
    }
    for r in 0..kernel.hold_room_count() {
        interaction.write_str(&format!(
            "hold room {r}: occupancy={}\n",
            kernel.hold_room(r).len(),
        ))?;
    }
    Ok(())
}
