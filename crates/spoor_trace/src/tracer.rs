//! The trace facade.
//!
//! A [`Tracer`] interleaves enter/leave markers and printed values from any
//! number of threads into one ordered stream of lines. All mutable state
//! lives behind a single mutex: per-thread nesting, the identity of the last
//! thread that produced output (so thread switches get a visible boundary),
//! the text-conversion cache, and the sink. Tracing never panics and never
//! returns an error; a poisoned lock silently drops the call.

use std::collections::HashMap;
use std::panic::Location;
use std::sync::Mutex;
use std::thread::{self, Thread, ThreadId};

use spoor_foundation::Value;
use spoor_render::buffer::RenderedLine;
use spoor_render::render::{Renderer, TextCache};
use spoor_render::settings::FormatSettings;

use crate::sink::{LineSink, NullSink, StderrSink};
use crate::state::ThreadState;

/// Everything the tracer mutates, behind one lock.
struct Shared {
    states: HashMap<ThreadId, ThreadState>,
    last_thread: Option<ThreadId>,
    last_output: String,
    cache: TextCache,
    sink: Box<dyn LineSink>,
}

/// Thread-safe call-trace facade.
///
/// Callers bracket traced functions with [`enter`](Self::enter) and
/// [`leave`](Self::leave) and dump values with [`print`](Self::print).
/// Caller positions are captured through `#[track_caller]`, so every line
/// names the source file and line that produced it.
///
/// # Example
///
/// ```
/// use spoor_foundation::Value;
/// use spoor_render::FormatSettings;
/// use spoor_trace::{MemorySink, Tracer};
///
/// let sink = MemorySink::new();
/// let lines = sink.handle();
/// let tracer = Tracer::new(FormatSettings::default(), sink);
///
/// tracer.enter();
/// tracer.print("x", &Value::Int(5));
/// tracer.leave();
///
/// let lines = lines.lock().unwrap();
/// assert!(lines.iter().any(|l| l.contains("x = 5")));
/// ```
pub struct Tracer {
    settings: FormatSettings,
    shared: Mutex<Shared>,
}

impl Tracer {
    /// Creates a tracer writing to the given sink.
    #[must_use]
    pub fn new(settings: FormatSettings, sink: impl LineSink + 'static) -> Self {
        Self {
            settings,
            shared: Mutex::new(Shared {
                states: HashMap::new(),
                last_thread: None,
                last_output: String::new(),
                cache: TextCache::new(),
                sink: Box::new(sink),
            }),
        }
    }

    /// Creates a tracer writing to standard error.
    #[must_use]
    pub fn stderr(settings: FormatSettings) -> Self {
        Self::new(settings, StderrSink::new())
    }

    /// Creates a tracer that drops everything without rendering.
    #[must_use]
    pub fn disabled() -> Self {
        Self::new(FormatSettings::default(), NullSink::new())
    }

    /// The settings this tracer renders with.
    #[must_use]
    pub fn settings(&self) -> &FormatSettings {
        &self.settings
    }

    /// Whether the sink accepts output.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.shared
            .lock()
            .map(|shared| shared.sink.is_enabled())
            .unwrap_or(false)
    }

    /// Marks entry into a traced function and deepens the current thread's
    /// nesting by one.
    #[track_caller]
    pub fn enter(&self) {
        let location = Location::caller();
        let Ok(mut shared) = self.shared.lock() else {
            return;
        };
        if !shared.sink.is_enabled() {
            return;
        }
        let thread = thread::current();
        self.emit_thread_boundary(&mut shared, &thread);

        let state = shared.states.entry(thread.id()).or_default();
        // A leave followed by an enter starts a new call group.
        let needs_blank = state.previous_nest_level() > state.nest_level();
        let indent = self
            .settings
            .call_indent
            .repeat(state.clamped_nest(self.settings.max_indents));
        state.up_nest();

        if needs_blank {
            shared.sink.write_line("");
        }
        let line = format!(
            "{indent}{}{}",
            self.settings.enter_marker,
            caller_position(location)
        );
        shared.sink.write_line(&line);
    }

    /// Marks exit from a traced function and shallows the current thread's
    /// nesting by one.
    ///
    /// An unmatched leave drives the recorded level negative; indentation
    /// stays clamped at zero and later enters recover.
    #[track_caller]
    pub fn leave(&self) {
        let location = Location::caller();
        let Ok(mut shared) = self.shared.lock() else {
            return;
        };
        if !shared.sink.is_enabled() {
            return;
        }
        let thread = thread::current();
        self.emit_thread_boundary(&mut shared, &thread);

        let state = shared.states.entry(thread.id()).or_default();
        state.down_nest();
        let indent = self
            .settings
            .call_indent
            .repeat(state.clamped_nest(self.settings.max_indents));

        let line = format!(
            "{indent}{}{}",
            self.settings.leave_marker,
            caller_position(location)
        );
        shared.sink.write_line(&line);
    }

    /// Prints a bare message at the current nesting.
    #[track_caller]
    pub fn print_message(&self, message: &str) {
        let location = Location::caller();
        let Ok(mut shared) = self.shared.lock() else {
            return;
        };
        if !shared.sink.is_enabled() {
            return;
        }
        let thread = thread::current();
        self.emit_thread_boundary(&mut shared, &thread);

        let Shared {
            states,
            last_output,
            sink,
            ..
        } = &mut *shared;
        let state = states.entry(thread.id()).or_default();
        let indent = self
            .settings
            .call_indent
            .repeat(state.clamped_nest(self.settings.max_indents));
        let line = format!("{indent}{message} ({})", caller_position(location));
        sink.write_line(&line);
        *last_output = line;
    }

    /// Renders `name = value` at the current nesting.
    ///
    /// When the settings register a symbolic-name table under `name`,
    /// matching integers in the value are tagged with their symbolic names.
    #[track_caller]
    pub fn print(&self, name: &str, value: &Value) {
        self.print_at(Location::caller(), name, None, value);
    }

    /// Renders `name = value`, applying the symbolic-name table registered
    /// under `map_name` regardless of `name`.
    #[track_caller]
    pub fn print_with(&self, name: &str, map_name: &str, value: &Value) {
        self.print_at(Location::caller(), name, Some(map_name), value);
    }

    /// The last output produced by a print, without trailing newline.
    #[must_use]
    pub fn last_output(&self) -> String {
        self.shared
            .lock()
            .map(|shared| shared.last_output.clone())
            .unwrap_or_default()
    }

    /// Forgets all per-thread nesting, the last-thread marker, and the last
    /// output.
    pub fn reset(&self) {
        let Ok(mut shared) = self.shared.lock() else {
            return;
        };
        shared.states.clear();
        shared.last_thread = None;
        shared.last_output.clear();
    }

    fn print_at(
        &self,
        location: &Location<'_>,
        name: &str,
        map_name: Option<&str>,
        value: &Value,
    ) {
        let Ok(mut shared) = self.shared.lock() else {
            return;
        };
        if !shared.sink.is_enabled() {
            return;
        }
        let thread = thread::current();
        self.emit_thread_boundary(&mut shared, &thread);

        let map_name = map_name.or_else(|| {
            self.settings
                .name_map
                .contains_key(name)
                .then_some(name)
        });
        // Rendering happens under the lock so the text cache warms across
        // calls from every thread.
        let lines =
            Renderer::new(&self.settings, &mut shared.cache).render_named(name, map_name, value);
        self.flush_lines(&mut shared, thread.id(), location, &lines);
    }

    /// Emits the thread-boundary banner when output switches threads,
    /// including before the very first line of output.
    fn emit_thread_boundary(&self, shared: &mut Shared, thread: &Thread) {
        let id = thread.id();
        if shared.last_thread == Some(id) {
            return;
        }
        shared.last_thread = Some(id);

        let label = match thread.name() {
            Some(name) => format!("{name} {id:?}"),
            None => format!("{id:?}"),
        };
        let banner = self
            .settings
            .thread_boundary_format
            .replacen("{}", &label, 1);
        shared.sink.write_line("");
        shared.sink.write_line(&banner);
        shared.sink.write_line("");
    }

    fn flush_lines(
        &self,
        shared: &mut Shared,
        thread_id: ThreadId,
        location: &Location<'_>,
        lines: &[RenderedLine],
    ) {
        let Shared {
            states,
            last_output,
            sink,
            ..
        } = shared;
        let state = states.entry(thread_id).or_default();
        let call_indent = self
            .settings
            .call_indent
            .repeat(state.clamped_nest(self.settings.max_indents));

        let mut output = String::new();
        let last = lines.len().saturating_sub(1);
        for (index, line) in lines.iter().enumerate() {
            state.set_data_nest_level(i32::try_from(line.nest).unwrap_or(i32::MAX));
            let data_indent = self
                .settings
                .data_indent
                .repeat(line.nest.min(self.settings.max_indents));
            let mut text = format!("{call_indent}{data_indent}{}", line.text);
            if index == last {
                text.push_str(&format!(" ({})", caller_position(location)));
            }
            sink.write_line(&text);
            if index > 0 {
                output.push('\n');
            }
            output.push_str(&text);
        }
        state.set_data_nest_level(0);
        *last_output = output;
    }
}

/// `file:line` of the traced call site, file reduced to its final path
/// component.
fn caller_position(location: &Location<'_>) -> String {
    let file = location.file();
    let name = file.rsplit(['/', '\\']).next().unwrap_or(file);
    format!("{name}:{}", location.line())
}
