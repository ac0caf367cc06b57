use super::*;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[derive(Default)]
struct Recorder {
    sizes: RefCell<Vec<Size>>,
    insets: RefCell<Vec<EdgeInsets>>,
    offsets: RefCell<Vec<Point>>,
    began: Cell<u32>,
    override_target: Cell<Option<Point>>,
}

impl DrawerContentListener for Recorder {
    fn did_change_content_size(&self, _content: &dyn DrawerContent, size: Size) {
        self.sizes.borrow_mut().push(size);
    }

    fn did_change_content_inset(&self, _content: &dyn DrawerContent, inset: EdgeInsets) {
        self.insets.borrow_mut().push(inset);
    }

    fn did_scroll(&self, content: &dyn DrawerContent) {
        self.offsets.borrow_mut().push(content.content_offset());
    }

    fn will_begin_dragging(&self, _content: &dyn DrawerContent) {
        self.began.set(self.began.get() + 1);
    }

    fn will_end_dragging(
        &self,
        _content: &dyn DrawerContent,
        _velocity: Point,
        target_offset: &mut Point,
    ) {
        if let Some(target) = self.override_target.get() {
            *target_offset = target;
        }
    }
}

fn subscribe(content: &ScrollContent, recorder: &Rc<Recorder>) {
    let weak: Weak<dyn DrawerContentListener> =
        Rc::downgrade(recorder) as Weak<dyn DrawerContentListener>;
    content.add_listener(weak);
}

#[test]
fn starts_at_resting_top() {
    let content = ScrollContent::new(Size::new(320.0, 900.0), EdgeInsets::vertical(20.0, 0.0));
    assert_eq!(content.content_offset(), Point::new(0.0, -20.0));
}

#[test]
fn size_and_inset_changes_are_deduplicated() {
    let content = ScrollContent::new(Size::new(320.0, 900.0), EdgeInsets::ZERO);
    let recorder = Rc::new(Recorder::default());
    subscribe(&content, &recorder);

    content.set_content_size(Size::new(320.0, 900.00001));
    content.set_content_size(Size::new(320.0, 1000.0));
    content.set_content_inset(EdgeInsets::ZERO);
    content.set_content_inset(EdgeInsets::vertical(0.0, 34.0));
    content.set_content_inset(EdgeInsets::vertical(0.0, 34.0));

    assert_eq!(recorder.sizes.borrow().as_slice(), &[Size::new(320.0, 1000.0)]);
    assert_eq!(
        recorder.insets.borrow().as_slice(),
        &[EdgeInsets::vertical(0.0, 34.0)]
    );
}

#[test]
fn dragging_down_lowers_the_offset() {
    let content = ScrollContent::new(Size::new(320.0, 900.0), EdgeInsets::ZERO);
    let recorder = Rc::new(Recorder::default());
    subscribe(&content, &recorder);

    content.begin_dragging();
    assert!(content.is_dragging());
    content.drag_by(-30.0);
    content.drag_by(10.0);
    content.drag_by(0.0);

    assert_eq!(recorder.began.get(), 1);
    assert_eq!(
        recorder.offsets.borrow().as_slice(),
        &[Point::new(0.0, 30.0), Point::new(0.0, 20.0)]
    );
}

#[test]
fn listeners_may_override_the_resting_offset() {
    let content = ScrollContent::new(Size::new(320.0, 900.0), EdgeInsets::ZERO);
    let first = Rc::new(Recorder::default());
    let second = Rc::new(Recorder::default());
    subscribe(&content, &first);
    subscribe(&content, &second);
    assert_eq!(content.listener_count(), 2);

    content.begin_dragging();
    content.drag_by(-50.0);
    second.override_target.set(Some(Point::new(0.0, 50.0)));
    let target = content.end_dragging(Point::new(0.0, 2.0));

    assert!(!content.is_dragging());
    assert_eq!(target, Point::new(0.0, 50.0));
    assert_eq!(content.content_offset(), target);
    assert_eq!(first.offsets.borrow().len(), 1);
}

#[test]
fn natural_fling_never_rests_above_the_top() {
    let content = ScrollContent::new(Size::new(320.0, 900.0), EdgeInsets::vertical(10.0, 0.0));
    content.begin_dragging();
    content.drag_by(-5.0);
    let target = content.end_dragging(Point::new(0.0, -3.0));
    assert_eq!(target.y, -10.0);
}

#[test]
fn dropped_listeners_are_forgotten() {
    let content = ScrollContent::new(Size::new(320.0, 900.0), EdgeInsets::ZERO);
    let recorder = Rc::new(Recorder::default());
    subscribe(&content, &recorder);
    drop(recorder);
    assert_eq!(content.listener_count(), 0);
    content.drag_by(-10.0);
}
