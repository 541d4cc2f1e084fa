//! Self-contained C++ program frame around an emitted query body.
//!
//! The frame defines the `date` value, tuple hashing, read-only mapped
//! columns in the layout strata-storage writes, and a `Database` handle
//! generated from the catalog, then runs the query body inside `main`.

use strata_catalog::Catalog;

const PRELUDE: &str = r##"#include <algorithm>
#include <cerrno>
#include <compare>
#include <cstdint>
#include <cstdio>
#include <cstring>
#include <fcntl.h>
#include <functional>
#include <iomanip>
#include <iostream>
#include <string>
#include <string_view>
#include <sys/mman.h>
#include <sys/stat.h>
#include <tuple>
#include <unistd.h>
#include <unordered_map>
#include <vector>

using namespace std;

struct date {
   int32_t value;
   date() = default;
   date(int32_t value) : value(value) {}
   friend auto operator<=>(const date&, const date&) = default;
   bool operator==(const date&) const = default;
};

ostream& operator<<(ostream& out, const date& d) {
   uint32_t a = d.value + 32044;
   uint32_t b = (4 * a + 3) / 146097;
   uint32_t c = a - 146097 * b / 4;
   uint32_t e4 = (4 * c + 3) / 1461;
   uint32_t e = c - 1461 * e4 / 4;
   uint32_t m = (5 * e + 2) / 153;
   uint32_t day = e - (153 * m + 2) / 5 + 1;
   uint32_t month = m + 3 - 12 * (m / 10);
   uint32_t year = 100 * b + e4 - 4800 + m / 10;
   char buffer[16];
   snprintf(buffer, sizeof(buffer), "%04u-%02u-%02u", year, month, day);
   return out << buffer;
}

namespace std {
template <>
struct hash<date> {
   size_t operator()(const date& d) const { return hash<int32_t>{}(d.value); }
};
template <typename... Ts>
struct hash<tuple<Ts...>> {
   size_t operator()(const tuple<Ts...>& t) const {
      size_t h = 0;
      apply([&](const auto&... v) {
         ((h = (h * 1099511628211ull) ^ hash<decay_t<decltype(v)>>{}(v)), ...);
      }, t);
      return h;
   }
};
}  // namespace std

static const void* mapFile(const string& path, size_t& size) {
   int fd = ::open(path.c_str(), O_RDONLY);
   if (fd < 0) {
      fprintf(stderr, "cannot open %s: %s\n", path.c_str(), strerror(errno));
      exit(1);
   }
   struct stat st;
   if (fstat(fd, &st) != 0) {
      fprintf(stderr, "cannot stat %s: %s\n", path.c_str(), strerror(errno));
      exit(1);
   }
   size = st.st_size;
   const void* mem = nullptr;
   if (size) {
      mem = mmap(nullptr, size, PROT_READ, MAP_SHARED, fd, 0);
      if (mem == MAP_FAILED) {
         fprintf(stderr, "cannot map %s: %s\n", path.c_str(), strerror(errno));
         exit(1);
      }
   }
   ::close(fd);
   return mem;
}

template <typename T>
struct Column {
   const T* values = nullptr;
   uint64_t count = 0;

   void load(const string& path) {
      size_t size = 0;
      values = static_cast<const T*>(mapFile(path, size));
      count = size / sizeof(T);
   }
   const T& operator[](uint64_t i) const { return values[i]; }
};

struct StringSlot {
   uint64_t size;
   uint64_t offset;
};

template <>
struct Column<string_view> {
   const char* base = nullptr;
   uint64_t count = 0;

   void load(const string& path) {
      size_t size = 0;
      base = static_cast<const char*>(mapFile(path, size));
      count = size ? *reinterpret_cast<const uint64_t*>(base) : 0;
   }
   string_view operator[](uint64_t i) const {
      auto slot = reinterpret_cast<const StringSlot*>(base + 8)[i];
      return string_view(base + slot.offset, slot.size);
   }
};
"##;

/// The `Database` struct: one member per relation exposing
/// `db.<relation>.<attribute>[i]` and `db.<relation>.tupleCount`.
fn database_struct(catalog: &Catalog) -> String {
    let mut out = String::from("struct Database {\n");
    for rel in catalog.relations() {
        out.push_str("   struct {\n");
        for (name, ty) in &rel.attributes {
            out.push_str(&format!("      Column<{}> {};\n", ty.cpp_name(), name));
        }
        out.push_str("      uint64_t tupleCount = 0;\n");
        out.push_str("      void load(const string& dir) {\n");
        for (name, _) in &rel.attributes {
            out.push_str(&format!("         {0}.load(dir + \"/{0}.bin\");\n", name));
        }
        let (first, _) = &rel.attributes[0];
        out.push_str(&format!("         tupleCount = {first}.count;\n"));
        out.push_str("      }\n");
        out.push_str(&format!("   }} {};\n", rel.name));
    }
    out.push_str("   void load(const string& dir) {\n");
    for rel in catalog.relations() {
        out.push_str(&format!("      {0}.load(dir + \"/{0}\");\n", rel.name));
    }
    out.push_str("   }\n};\n");
    out
}

/// Wrap an emitted query body into a complete program.
pub fn wrap_program(catalog: &Catalog, body: &str) -> String {
    format!(
        "{PRELUDE}\n{}\nint main(int argc, char** argv) {{\n\
         if (argc < 2) {{\n\
         fprintf(stderr, \"usage: %s <data-dir>\\n\", argv[0]);\n\
         return 1;\n\
         }}\n\
         Database db;\n\
         db.load(argv[1]);\n\
         std::cout << std::fixed << std::setprecision(2);\n\
         {body}\
         return 0;\n\
         }}\n",
        database_struct(catalog)
    )
}
