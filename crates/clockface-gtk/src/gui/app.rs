use crate::config::{self, Overrides};
use crate::events::AppEvent;
use crate::gui::view::CairoRenderer;
use clockface::{ClockFace, FaceAction, Point, TimeValue};
use gtk::gdk;
use gtk::prelude::*;
use gtk4 as gtk;
use relm4::prelude::*;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

pub struct AppInit {
    pub face: ClockFace,
    pub overrides: Overrides,
    pub rx: async_channel::Receiver<AppEvent>,
}

pub struct AppModel {
    pub face: Rc<RefCell<ClockFace>>,
    pub overrides: Overrides,
    pub title: String,
    pub drawing_area: gtk::DrawingArea,
    ticking: Rc<Cell<bool>>,
}

#[derive(Debug)]
pub enum AppMsg {
    DragBegin(Point),
    DragUpdate(Point),
    DragEnd,
    DragCancel,
    Resize(f64, f64),
    NudgeHour(i64),
    NudgeMinute(i64),
    ToggleSmooth,
    Committed(TimeValue),
    ConfigReload,
}

impl From<AppEvent> for AppMsg {
    fn from(event: AppEvent) -> Self {
        match event {
            AppEvent::ConfigReload => AppMsg::ConfigReload,
        }
    }
}

fn key_message(key: gdk::Key) -> Option<AppMsg> {
    if key == gdk::Key::Up {
        Some(AppMsg::NudgeHour(1))
    } else if key == gdk::Key::Down {
        Some(AppMsg::NudgeHour(-1))
    } else if key == gdk::Key::Right {
        Some(AppMsg::NudgeMinute(1))
    } else if key == gdk::Key::Left {
        Some(AppMsg::NudgeMinute(-1))
    } else if key == gdk::Key::s {
        Some(AppMsg::ToggleSmooth)
    } else if key == gdk::Key::Escape {
        Some(AppMsg::DragCancel)
    } else {
        None
    }
}

/// Window title: the committed time as the hands show it, on a 12-hour dial.
fn window_title(face: &ClockFace) -> String {
    let hour = match face.hour() % 12 {
        0 => 12,
        h => h,
    };
    let half = if face.is_am() { "AM" } else { "PM" };
    format!("{}:{:02} {}", hour, face.minute(), half)
}

#[relm4::component(pub)]
impl SimpleComponent for AppModel {
    type Init = AppInit;
    type Input = AppMsg;
    type Output = ();

    view! {
        #[root]
        gtk::ApplicationWindow {
            #[watch]
            set_title: Some(&model.title),
            set_default_size: (360, 360),

            add_controller = gtk::EventControllerKey {
                connect_key_pressed[sender] => move |_, key, _, _| {
                    match key_message(key) {
                        Some(msg) => {
                            sender.input(msg);
                            glib::Propagation::Stop
                        }
                        None => glib::Propagation::Proceed,
                    }
                }
            },

            #[name = "drawing_area"]
            gtk::DrawingArea {
                set_hexpand: true,
                set_vexpand: true,

                connect_resize[sender] => move |_, width, height| {
                    sender.input(AppMsg::Resize(width as f64, height as f64));
                },

                add_controller = gtk::GestureDrag {
                    connect_drag_begin[sender] => move |_, x, y| {
                        sender.input(AppMsg::DragBegin(Point::new(x, y)));
                    },
                    connect_drag_update[sender] => move |gesture, dx, dy| {
                        if let Some((x, y)) = gesture.start_point() {
                            sender.input(AppMsg::DragUpdate(Point::new(x + dx, y + dy)));
                        }
                    },
                    connect_drag_end[sender] => move |_, _, _| {
                        sender.input(AppMsg::DragEnd);
                    },
                }
            }
        }
    }

    fn init(
        init: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let AppInit { face, overrides, rx } = init;

        let model = AppModel {
            title: window_title(&face),
            face: Rc::new(RefCell::new(face)),
            overrides,
            drawing_area: gtk::DrawingArea::default(),
            ticking: Rc::new(Cell::new(false)),
        };

        let widgets = view_output!();

        let mut model = model;
        model.drawing_area = widgets.drawing_area.clone();

        let face_draw = model.face.clone();
        widgets.drawing_area.set_draw_func(move |_, cr, _, _| {
            if let Err(e) = face_draw.borrow().draw(&mut CairoRenderer::new(cr)) {
                log::error!("Drawing error: {}", e);
            }
        });

        let sender_clone = sender.clone();
        relm4::spawn(async move {
            while let Ok(event) = rx.recv().await {
                sender_clone.input(AppMsg::from(event));
            }
        });

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, sender: ComponentSender<Self>) {
        let action = self.dispatch(msg);
        if action.should_redraw {
            self.drawing_area.queue_draw();
        }
        if let Some(time) = action.committed {
            self.on_committed(time);
        }
        // a reload can move the offset without committing anything
        self.title = window_title(&self.face.borrow());
        self.start_ticking(&sender);
    }
}

impl AppModel {
    fn dispatch(&mut self, msg: AppMsg) -> FaceAction {
        let mut face = self.face.borrow_mut();
        match msg {
            AppMsg::DragBegin(point) => face.drag_begin(point),
            AppMsg::DragUpdate(point) => face.drag_update(point),
            AppMsg::DragEnd => face.drag_end(),
            AppMsg::DragCancel => face.drag_cancel(),
            AppMsg::Resize(width, height) => {
                face.resize(width, height);
                FaceAction::redraw()
            }
            AppMsg::NudgeHour(step) => {
                let hour = i64::from(face.target_time().hour()) + step;
                face.set_hour(hour, true)
            }
            AppMsg::NudgeMinute(step) => {
                let minute = i64::from(face.target_time().minute()) + step;
                face.set_minute(minute, true)
            }
            AppMsg::ToggleSmooth => {
                let smooth = !face.minute_hand_moves_smoothly();
                face.set_minute_hand_moves_smoothly(smooth);
                log::info!("Smooth minute hand {}", if smooth { "on" } else { "off" });
                FaceAction::none()
            }
            AppMsg::Committed(time) => FaceAction {
                should_redraw: false,
                committed: Some(time),
            },
            AppMsg::ConfigReload => match config::load_config() {
                Ok(mut new_config) => {
                    self.overrides.apply(&mut new_config);
                    match face.apply_config(new_config.style, new_config.behavior) {
                        Ok(action) => {
                            log::info!("Configuration reloaded");
                            action
                        }
                        Err(e) => {
                            log::error!("Rejected reloaded config: {}", e);
                            FaceAction::none()
                        }
                    }
                }
                Err(e) => {
                    log::error!("Failed to reload config: {}", e);
                    FaceAction::none()
                }
            },
        }
    }

    fn on_committed(&self, time: TimeValue) {
        let face = self.face.borrow();
        log::info!("Time set to {} ({} displayed)", time, face.displayed_time());
    }

    /// Drives the animation from the widget's frame clock until it finishes.
    fn start_ticking(&self, sender: &ComponentSender<Self>) {
        if self.ticking.get() || !self.face.borrow().is_animating() {
            return;
        }
        self.ticking.set(true);

        let face = self.face.clone();
        let ticking = self.ticking.clone();
        let sender = sender.clone();
        self.drawing_area.add_tick_callback(move |area, _| {
            let action = face.borrow_mut().tick();
            if action.should_redraw {
                area.queue_draw();
            }
            if let Some(time) = action.committed {
                sender.input(AppMsg::Committed(time));
            }
            if face.borrow().is_animating() {
                glib::ControlFlow::Continue
            } else {
                ticking.set(false);
                glib::ControlFlow::Break
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clockface::{Behavior, ClockStyle, ZoneOffset};

    #[test]
    fn test_window_title_follows_offset() {
        let mut face = ClockFace::new(ClockStyle::default(), Behavior::default()).unwrap();
        face.set_time(11, 30, false);
        assert_eq!(window_title(&face), "11:30 AM");

        let behavior = Behavior {
            utc_offset_seconds: ZoneOffset::from_hours_minutes(1, 0),
            ..Behavior::default()
        };
        face.apply_config(ClockStyle::default(), behavior).unwrap();
        assert_eq!(window_title(&face), "12:30 PM");

        face.set_time(23, 5, false);
        assert_eq!(window_title(&face), "12:05 AM");
    }
}
