#![allow(dead_code)]

pub mod app_tree {
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    /// Temporary application root with a `controllers/` directory.
    pub struct AppTree {
        dir: TempDir,
    }

    impl AppTree {
        pub fn new() -> Self {
            let dir = tempfile::tempdir().unwrap();
            fs::create_dir_all(dir.path().join("controllers")).unwrap();
            AppTree { dir }
        }

        pub fn path(&self) -> &Path {
            self.dir.path()
        }

        pub fn controllers_dir(&self) -> PathBuf {
            self.dir.path().join("controllers")
        }

        /// Write the unit file for `class` and return its path.
        pub fn add_unit(&self, class: &str) -> PathBuf {
            let path = self.controllers_dir().join(format!("{class}.rs"));
            fs::write(&path, format!("// {class} controller unit\n")).unwrap();
            path
        }

        /// Write a file relative to the application root.
        pub fn write(&self, relative: &str, content: &str) -> PathBuf {
            let path = self.dir.path().join(relative);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(&path, content).unwrap();
            path
        }

        pub fn mkdir(&self, relative: &str) -> PathBuf {
            let path = self.dir.path().join(relative);
            fs::create_dir_all(&path).unwrap();
            path
        }
    }
}

pub mod fakes {
    use starfront::adapter::DataAdapter;
    use starfront::config::ConfigTree;
    use starfront::dispatcher::LogSink;
    use starfront::loader::{FsResolver, PathResolver};
    use std::cell::{Cell, RefCell};
    use std::collections::HashSet;
    use std::path::{Path, PathBuf};
    use std::rc::Rc;

    /// Log sink recording every message.
    #[derive(Clone, Default)]
    pub struct RecordingSink {
        pub messages: Rc<RefCell<Vec<String>>>,
    }

    impl LogSink for RecordingSink {
        fn log(&self, message: &str) {
            self.messages.borrow_mut().push(message.to_string());
        }
    }

    /// Data adapter recording settings calls and closes.
    #[derive(Clone, Default)]
    pub struct RecordingAdapter {
        pub settings: Rc<RefCell<Vec<ConfigTree>>>,
        pub closes: Rc<Cell<usize>>,
    }

    impl DataAdapter for RecordingAdapter {
        fn settings(&mut self, resources: &ConfigTree) {
            self.settings.borrow_mut().push(resources.clone());
        }

        fn close(&mut self) {
            self.closes.set(self.closes.get() + 1);
        }
    }

    /// Filesystem resolver that reports selected paths as unreadable.
    pub struct UnreadableResolver {
        inner: FsResolver,
        unreadable: HashSet<PathBuf>,
    }

    impl UnreadableResolver {
        pub fn new(application_path: &Path, unreadable: &[PathBuf]) -> Self {
            UnreadableResolver {
                inner: FsResolver::new(application_path),
                unreadable: unreadable.iter().cloned().collect(),
            }
        }
    }

    impl PathResolver for UnreadableResolver {
        fn join_path(&self, dir: &Path, name: &str) -> PathBuf {
            self.inner.join_path(dir, name)
        }

        fn exists(&self, path: &Path) -> bool {
            self.inner.exists(path)
        }

        fn is_readable(&self, path: &Path) -> bool {
            !self.unreadable.contains(path) && self.inner.is_readable(path)
        }

        fn default_module_directory(&self, controller_key: &str) -> PathBuf {
            self.inner.default_module_directory(controller_key)
        }
    }
}

pub mod controllers {
    use starfront::controller::{dispatch_action, Action, Controller, ControllerContext};
    use starfront::server::OutputBuffer;
    use starfront::view::Layout;
    use starfront::{KernelError, Result};

    /// `index` writes `hello`; `gbk` writes GBK bytes; `fail` raises a 500;
    /// `forbid` a 403.
    pub struct Home {
        layout: Option<Layout>,
    }

    impl Home {
        const ACTIONS: &'static [Action<Self>] = &[
            ("index", Home::index),
            ("gbk", Home::gbk),
            ("fail", Home::fail),
            ("forbid", Home::forbid),
        ];

        pub fn new(_ctx: ControllerContext) -> Result<Self> {
            Ok(Home { layout: None })
        }

        pub fn with_layout(_ctx: ControllerContext) -> Result<Self> {
            Ok(Home {
                layout: Some(Layout::from_source("<html>{{ content }}</html>")),
            })
        }

        pub fn with_disabled_layout(_ctx: ControllerContext) -> Result<Self> {
            let mut layout = Layout::from_source("<html>{{ content }}</html>");
            layout.disable();
            Ok(Home {
                layout: Some(layout),
            })
        }

        pub fn with_broken_layout(_ctx: ControllerContext) -> Result<Self> {
            Ok(Home {
                layout: Some(Layout::from_source("{% if %}")),
            })
        }

        fn index(&mut self, out: &mut OutputBuffer) -> Result<()> {
            out.write_str("hello");
            Ok(())
        }

        fn gbk(&mut self, out: &mut OutputBuffer) -> Result<()> {
            out.write_bytes(&[0xC4, 0xE3]);
            Ok(())
        }

        fn fail(&mut self, out: &mut OutputBuffer) -> Result<()> {
            out.write_str("partial output");
            Err(KernelError::Controller(anyhow::anyhow!("database went away")))
        }

        fn forbid(&mut self, _out: &mut OutputBuffer) -> Result<()> {
            Err(KernelError::http(403, "members only"))
        }
    }

    impl Controller for Home {
        fn dispatch(&mut self, action: &str, out: &mut OutputBuffer) -> Result<()> {
            dispatch_action(self, Self::ACTIONS, action, out)
        }

        fn layout_mut(&mut self) -> Option<&mut Layout> {
            self.layout.as_mut()
        }
    }
}
