//=========================================================================
// Headless Demo
//=========================================================================
//
// Runs a small three-state game with no window:
//
//   Title ──Enter──> Level ──Escape──> Pause ──(pop score)──> Level
//                      └── all asteroids gone ──> pop ──> exit
//
// A background thread plays the keyboard through the EventPump channel.
//
// Usage: strata-headless [settings.toml]
//
//=========================================================================

//=== External Dependencies ===============================================

use std::error::Error;
use std::path::Path;
use std::thread;
use std::time::Duration;

use log::info;

//=== Internal Dependencies ===============================================

use strata_engine::core::error_log;
use strata_engine::prelude::*;

//=== Title ===============================================================

struct Title;

impl State for Title {
    fn update(&mut self, ctx: &mut Context<'_>) -> HookResult {
        let start = ctx
            .components()
            .get::<InputState>()
            .is_some_and(|input| input.is_key_pressed(KeyCode::Enter));

        if start {
            info!("Title: starting level");
            ctx.change(level());
        }
        Ok(())
    }

    fn render(&mut self, _ctx: &mut Context<'_>) -> HookResult {
        Ok(())
    }

    fn name(&self) -> &str {
        "Title"
    }
}

//=== Level ===============================================================

fn level() -> ContainerState {
    let mut state = ContainerState::new("Level").with_object(ObjectNode::new(Director));
    for id in 0..5 {
        state.add(
            ObjectNode::new(Asteroid { id, hp: 20 + id * 15 })
                .with_child(ObjectNode::new(Trail { parent: id })),
        );
    }
    state
}

/// Watches input and ends the level once every asteroid is gone.
struct Director;

impl GameObject for Director {
    fn update(&mut self, ctx: &mut ObjectContext<'_, '_>) -> HookResult {
        let pause = ctx
            .components()
            .get::<InputState>()
            .is_some_and(|input| input.is_key_pressed(KeyCode::Escape));
        // No tally yet on the level's first frame.
        let remaining = ctx.components().get::<Field>().map(|f| f.asteroids);

        if pause {
            ctx.push(Pause { frames: 0 });
        } else if remaining == Some(0) {
            info!("Level cleared at frame {}", ctx.frame());
            ctx.pop();
        }

        ctx.components_mut().get_or_default::<Field>().asteroids = 0;
        Ok(())
    }

    fn render(&mut self, _ctx: &mut ObjectContext<'_, '_>, bucket: &mut RendererBucket) -> HookResult {
        bucket.put(100, |_| log::trace!("hud"));
        Ok(())
    }

    fn wakeup(&mut self, _ctx: &mut ObjectContext<'_, '_>, args: &WakeArgs) -> HookResult {
        info!("Resumed after pause ({} frames)", args.int("paused_for").unwrap_or(0));
        Ok(())
    }

    fn name(&self) -> &str {
        "Director"
    }
}

/// Per-frame tally the director reads.
#[derive(Default)]
struct Field {
    asteroids: u32,
}

struct Asteroid {
    id: u32,
    hp: u32,
}

impl GameObject for Asteroid {
    fn update(&mut self, ctx: &mut ObjectContext<'_, '_>) -> HookResult {
        self.hp = self.hp.saturating_sub(1);
        if self.hp == 0 {
            info!("Asteroid {} destroyed", self.id);
            ctx.destroy();
        } else {
            ctx.components_mut().get_or_default::<Field>().asteroids += 1;
        }
        Ok(())
    }

    fn render(&mut self, _ctx: &mut ObjectContext<'_, '_>, bucket: &mut RendererBucket) -> HookResult {
        let (id, hp) = (self.id, self.hp);
        bucket.put(10, move |_| log::trace!("asteroid {} hp {}", id, hp));
        Ok(())
    }

    fn destroy(&mut self, _ctx: &mut Context<'_>) -> HookResult {
        log::debug!("Asteroid {} removed", self.id);
        Ok(())
    }

    fn name(&self) -> &str {
        "Asteroid"
    }
}

struct Trail {
    parent: u32,
}

impl GameObject for Trail {
    fn update(&mut self, _ctx: &mut ObjectContext<'_, '_>) -> HookResult {
        Ok(())
    }

    fn render(&mut self, _ctx: &mut ObjectContext<'_, '_>, bucket: &mut RendererBucket) -> HookResult {
        let parent = self.parent;
        bucket.put(5, move |_| log::trace!("trail of {}", parent));
        Ok(())
    }

    fn name(&self) -> &str {
        "Trail"
    }
}

//=== Pause ===============================================================

struct Pause {
    frames: u32,
}

impl State for Pause {
    fn update(&mut self, ctx: &mut Context<'_>) -> HookResult {
        self.frames += 1;
        let resume = ctx
            .components()
            .get::<InputState>()
            .is_some_and(|input| input.is_key_pressed(KeyCode::Escape));

        if resume {
            ctx.pop_with(WakeArgs::new().with("paused_for", self.frames));
        }
        Ok(())
    }

    fn render(&mut self, _ctx: &mut Context<'_>) -> HookResult {
        Ok(())
    }

    fn is_transparent(&self) -> bool {
        false
    }

    fn name(&self) -> &str {
        "Pause"
    }
}

//=== Main ================================================================

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let settings = match std::env::args().nth(1) {
        Some(path) => Settings::load(&path).map_err(|e| {
            // No root path without settings; fall back to the working directory.
            error_log::record(Path::new("."), &e);
            e
        })?,
        None => Settings::default(),
    };

    let target_fps = settings.target_fps;
    let (keys, pump) = EventPump::channel();
    let mut engine = EngineBuilder::new()
        .with_settings(settings)
        .with_input_source(pump)
        .with_initial_state(Title)
        .build()?;

    let frame = Duration::from_secs_f64(1.0 / target_fps);
    let player = thread::spawn(move || {
        let script = [(5, KeyCode::Enter), (20, KeyCode::Escape), (30, KeyCode::Escape)];
        for (wait_frames, key) in script {
            thread::sleep(frame * wait_frames);
            if keys.send(InputEvent::key_down(key)).is_err() {
                return;
            }
            thread::sleep(frame * 2);
            let _ = keys.send(InputEvent::key_up(key));
        }
    });

    let report = engine.run()?;
    info!("Finished after {} frames", report.frames);

    let _ = player.join();
    Ok(())
}
