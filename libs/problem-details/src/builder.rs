//! Chained setters shared by [`Problem`](crate::Problem) and
//! [`ExtendedProblem`](crate::ExtendedProblem).
//!
//! Both types expose the same builder surface and each setter must return the
//! caller's own type, so the methods are generated from one definition. The
//! macro arguments name the path from `self` to the embedded `Problem`
//! (nothing for `Problem` itself, `problem` for the extended wrapper).

macro_rules! problem_builder {
    ($($field:ident).*) => {
        /// Sets the problem type URI. The value is checked by `validate`.
        pub fn with_type(mut self, type_url: impl Into<String>) -> Self {
            self$(.$field)*.type_url = type_url.into();
            self
        }

        /// Sets the short, human-readable summary of the problem type.
        pub fn with_title(mut self, title: impl Into<String>) -> Self {
            self$(.$field)*.title = title.into();
            self
        }

        /// Sets the HTTP status code.
        ///
        /// If no title is set yet, the title becomes the canonical reason
        /// phrase of `status`. A title that is already set is never replaced.
        pub fn with_status(mut self, status: ::http::StatusCode) -> Self {
            let problem = &mut self$(.$field)*;
            problem.status = Some(status);
            if problem.title.is_empty()
                && let Some(reason) = status.canonical_reason()
            {
                reason.clone_into(&mut problem.title);
            }
            self
        }

        /// Sets the occurrence-specific explanation.
        pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
            self$(.$field)*.detail = detail.into();
            self
        }

        /// Sets the detail from pre-built format arguments.
        ///
        /// ```
        /// # use problem_details::Problem;
        /// let p = Problem::new().with_detail_fmt(format_args!("{:?} is not a valid integer", "foo"));
        /// assert_eq!(p.detail, r#""foo" is not a valid integer"#);
        /// ```
        pub fn with_detail_fmt(mut self, args: ::std::fmt::Arguments<'_>) -> Self {
            self$(.$field)*.detail = args.to_string();
            self
        }

        /// Sets the detail to the message of `err`.
        pub fn with_error<E>(mut self, err: &E) -> Self
        where
            E: ::std::error::Error + ?Sized,
        {
            self$(.$field)*.detail = err.to_string();
            self
        }

        /// Sets the URI identifying this specific occurrence.
        pub fn with_instance(mut self, instance: impl Into<String>) -> Self {
            self$(.$field)*.instance = instance.into();
            self
        }
    };
}

pub(crate) use problem_builder;
